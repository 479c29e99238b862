//! System-on-Chip Traits.
//!
//! This module defines the common interface implemented by every
//! memory-mapped component in the SoC. It allows the system bus to route
//! accesses to disparate devices uniformly.

use crate::common::AccessWidth;
use crate::pmu::{PowerManager, Scheduler};

/// Trait for memory-mapped I/O devices.
///
/// All devices attached to the system bus implement this trait to handle
/// reads and writes at offsets relative to their base address. Accesses
/// always complete; a device that cannot make sense of an access logs it
/// and treats it as a no-op.
pub trait Device {
    /// Returns the user-friendly name of the device.
    ///
    /// Used for debugging and logging purposes.
    fn name(&self) -> &str;

    /// Returns the address range (Base Address, Size) of the device.
    ///
    /// Used by the system bus to route accesses to the correct device.
    fn address_range(&self) -> (u64, u64);

    /// Reads a value of the given width at the specified offset.
    ///
    /// # Arguments
    ///
    /// * `offset` - Offset relative to the device base
    /// * `width` - Access width
    /// * `sched` - Host clock and event queue
    fn read(&mut self, offset: u64, width: AccessWidth, sched: &mut dyn Scheduler) -> u64;

    /// Writes a value of the given width at the specified offset.
    ///
    /// `data` holds the little-endian bus word; only the low `width`
    /// bytes are meaningful.
    fn write(&mut self, offset: u64, width: AccessWidth, data: u64, sched: &mut dyn Scheduler);

    /// Downcasts the device to a power manager reference if applicable.
    fn as_power_manager(&self) -> Option<&PowerManager> {
        None
    }

    /// Downcasts the device to a mutable power manager reference if applicable.
    ///
    /// Used by the system to deliver timer expiries to the PMU.
    fn as_power_manager_mut(&mut self) -> Option<&mut PowerManager> {
        None
    }
}
