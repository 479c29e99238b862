//! Register Decoder.
//!
//! Maps an offset inside the PMU window to a register. The register groups
//! are described by a single table of windows; each per-domain window is cut
//! into one stride per domain (registry order) and each stride into equally
//! sized slots. This table is the only place where address semantics live.

use super::domain::{DomainId, TransitionKind};
use crate::config::PmuConfig;

/// Register groups of the PMU.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterGroup {
    State,
    Voltage,
    Capture,
    DelayConfig,
}

/// A decoded register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    /// State-control slot of a domain.
    State(DomainId),
    /// Voltage-control slot of a domain.
    Voltage(DomainId),
    /// One delay-table entry of a domain.
    Delay(DomainId, TransitionKind),
    /// The capture-control register.
    Capture,
}

const STATE: usize = 0;
const VOLTAGE: usize = 1;
const CAPTURE: usize = 2;
const DELAY: usize = 3;

#[derive(Clone, Copy, Debug)]
struct GroupWindow {
    group: RegisterGroup,
    offset: u64,
    size: u64,
    /// Bytes per domain; zero for the capture window.
    stride: u64,
    /// Registers per domain stride.
    slots: u64,
}

impl GroupWindow {
    fn contains(&self, offset: u64) -> bool {
        offset >= self.offset && offset - self.offset < self.size
    }
}

/// Offset → register table for one PMU instance.
#[derive(Clone, Debug)]
pub struct RegisterMap {
    windows: [GroupWindow; 4],
    domains: usize,
}

impl RegisterMap {
    /// Builds the table for `domains` domains from the PMU configuration.
    pub fn new(config: &PmuConfig, domains: usize) -> Self {
        let per_domain = |group, offset, stride, slots| GroupWindow {
            group,
            offset,
            size: config.group_size,
            stride,
            slots,
        };
        Self {
            windows: [
                per_domain(
                    RegisterGroup::State,
                    config.state_offset,
                    config.state_stride,
                    1,
                ),
                per_domain(
                    RegisterGroup::Voltage,
                    config.voltage_offset,
                    config.voltage_stride,
                    1,
                ),
                GroupWindow {
                    group: RegisterGroup::Capture,
                    offset: config.capture_offset,
                    size: config.capture_size,
                    stride: 0,
                    slots: 1,
                },
                per_domain(
                    RegisterGroup::DelayConfig,
                    config.delay_offset,
                    config.delay_stride,
                    TransitionKind::ALL.len() as u64,
                ),
            ],
            domains,
        }
    }

    /// Decodes an offset relative to the PMU base.
    ///
    /// # Returns
    ///
    /// `None` when the offset is outside every group window, falls in a
    /// stride beyond the last domain, or is not aligned to a slot.
    pub fn decode(&self, offset: u64) -> Option<Register> {
        let window = self.windows.iter().find(|w| w.contains(offset))?;
        if window.group == RegisterGroup::Capture {
            return Some(Register::Capture);
        }

        if window.stride == 0 {
            return None;
        }
        let rel = offset - window.offset;
        let domain = (rel / window.stride) as usize;
        if domain >= self.domains {
            return None;
        }
        let slot_size = window.stride / window.slots;
        let within = rel % window.stride;
        if slot_size == 0 || within % slot_size != 0 {
            return None;
        }
        let slot = (within / slot_size) as usize;
        let id = DomainId::new(domain);

        match window.group {
            RegisterGroup::State => Some(Register::State(id)),
            RegisterGroup::Voltage => Some(Register::Voltage(id)),
            RegisterGroup::DelayConfig => {
                TransitionKind::from_index(slot).map(|kind| Register::Delay(id, kind))
            }
            RegisterGroup::Capture => Some(Register::Capture),
        }
    }

    /// Returns the offset of a register relative to the PMU base.
    pub fn offset_of(&self, register: Register) -> u64 {
        let slot = |w: &GroupWindow, id: DomainId, index: u64| {
            w.offset + id.index() as u64 * w.stride + index * (w.stride / w.slots)
        };
        match register {
            Register::State(id) => slot(&self.windows[STATE], id, 0),
            Register::Voltage(id) => slot(&self.windows[VOLTAGE], id, 0),
            Register::Delay(id, kind) => slot(&self.windows[DELAY], id, kind.index() as u64),
            Register::Capture => self.windows[CAPTURE].offset,
        }
    }
}
