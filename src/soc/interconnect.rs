//! System Bus Interconnect.
//!
//! This module implements the system bus, which routes register-mapped
//! accesses to the appropriate device based on the physical address map.
//! Accesses that hit no device complete anyway: reads return 0 and writes
//! are dropped, both with a log entry.

use log::{info, warn};

use super::traits::Device;
use crate::common::AccessWidth;
use crate::pmu::{PowerManager, Scheduler};

/// System interconnect bus for device communication.
///
/// Manages memory-mapped access to the PMU and the peripherals it
/// supplies. Routes each access to the device whose range contains the
/// address, passing the offset relative to that device's base.
pub struct Bus {
    devices: Vec<Box<dyn Device>>,

    last_device_idx: usize,

    pmu_idx: Option<usize>,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    /// Creates a new bus with no devices attached.
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            last_device_idx: 0,
            pmu_idx: None,
        }
    }

    /// Adds a device to the bus.
    ///
    /// Devices are kept sorted by base address.
    ///
    /// # Arguments
    ///
    /// * `dev` - The device to add to the bus
    pub fn add_device(&mut self, dev: Box<dyn Device>) {
        let (base, size) = dev.address_range();
        info!(
            "registered device: {:<12} @ {:#010x} - {:#010x} ({} bytes)",
            dev.name(),
            base,
            base.saturating_add(size),
            size
        );
        self.devices.push(dev);

        self.devices.sort_by_key(|d| d.address_range().0);

        self.pmu_idx = self
            .devices
            .iter()
            .position(|d| d.as_power_manager().is_some());
        self.last_device_idx = 0;
    }

    /// Names and ranges of the attached devices, in address order.
    pub fn devices(&self) -> impl Iterator<Item = (&str, u64, u64)> {
        self.devices.iter().map(|d| {
            let (base, size) = d.address_range();
            (d.name(), base, size)
        })
    }

    /// Checks if a physical address maps to a device.
    pub fn is_valid_address(&self, paddr: u64) -> bool {
        self.devices.iter().any(|dev| {
            let (start, size) = dev.address_range();
            paddr >= start && paddr - start < size
        })
    }

    /// Returns the power manager attached to the bus, if any.
    pub fn power_manager(&self) -> Option<&PowerManager> {
        self.devices.get(self.pmu_idx?)?.as_power_manager()
    }

    /// Mutable access to the power manager attached to the bus, if any.
    pub fn power_manager_mut(&mut self) -> Option<&mut PowerManager> {
        let idx = self.pmu_idx?;
        self.devices.get_mut(idx)?.as_power_manager_mut()
    }

    /// Helper to find the device mapped to a specific physical address.
    ///
    /// Returns a mutable reference to the device and the offset within that device.
    #[inline(always)]
    fn find_device(&mut self, paddr: u64) -> Option<(&mut Box<dyn Device>, u64)> {
        if self.last_device_idx < self.devices.len() {
            let (start, size) = self.devices[self.last_device_idx].address_range();
            if paddr >= start && paddr - start < size {
                return Some((&mut self.devices[self.last_device_idx], paddr - start));
            }
        }

        for (i, dev) in self.devices.iter_mut().enumerate() {
            let (start, size) = dev.address_range();
            if paddr >= start && paddr - start < size {
                self.last_device_idx = i;
                return Some((dev, paddr - start));
            }
        }
        None
    }

    /// Reads a value of the given width from the specified physical address.
    pub fn read(&mut self, paddr: u64, width: AccessWidth, sched: &mut dyn Scheduler) -> u64 {
        if let Some((dev, offset)) = self.find_device(paddr) {
            dev.read(offset, width, sched)
        } else {
            warn!("bus read at unmapped address {paddr:#x}");
            0
        }
    }

    /// Writes a value of the given width to the specified physical address.
    pub fn write(&mut self, paddr: u64, width: AccessWidth, data: u64, sched: &mut dyn Scheduler) {
        if let Some((dev, offset)) = self.find_device(paddr) {
            dev.write(offset, width, data, sched);
        } else {
            warn!("bus write of {data:#x} at unmapped address {paddr:#x}");
        }
    }
}
