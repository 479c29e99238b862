//! Workload Loader.
//!
//! A workload is the software side of a simulation run: a list of timed
//! bus accesses read from a TOML file. Each step names the tick it is
//! issued at, the direction, the physical address and the access width:
//!
//! ```toml
//! [[step]]
//! at = 100
//! op = "write"
//! addr = 0x20004000
//! value = 3
//!
//! [[step]]
//! at = 200
//! op = "write"
//! addr = 0x20005004
//! width = 8
//! value = 0.8
//! ```
//!
//! Integer values are truncated to the access width; floating-point values
//! are encoded as `f32` for 4-byte writes and `f64` for 8-byte writes.

use serde::Deserialize;
use std::fs;

use crate::common::{AccessType, AccessWidth, Payload, WorkloadError};

fn default_width() -> u64 {
    4
}

/// Value carried by a write step.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StepValue {
    Int(u64),
    Float(f64),
}

/// One timed bus access.
#[derive(Clone, Debug, Deserialize)]
pub struct Step {
    /// Tick at which the access is issued.
    #[serde(default)]
    pub at: u64,
    pub op: AccessType,
    pub addr: u64,
    /// Access width in bytes.
    #[serde(default = "default_width")]
    pub width: u64,
    #[serde(default)]
    pub value: Option<StepValue>,
}

/// A validated step, ready to put on the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusAccess {
    pub at: u64,
    pub op: AccessType,
    pub addr: u64,
    pub width: AccessWidth,
    /// Raw bus word; zero for reads.
    pub data: u64,
}

#[derive(Debug, Deserialize)]
struct WorkloadFile {
    #[serde(default, rename = "step")]
    steps: Vec<Step>,
}

/// A timed sequence of bus accesses.
#[derive(Clone, Debug, Default)]
pub struct Workload {
    accesses: Vec<BusAccess>,
}

impl Workload {
    /// Parses and validates a workload.
    ///
    /// Steps are ordered by issue time; steps sharing a tick keep their
    /// order from the file.
    pub fn from_toml_str(text: &str) -> Result<Self, WorkloadError> {
        let file: WorkloadFile = toml::from_str(text)?;
        let mut accesses = file
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| step.encode(i))
            .collect::<Result<Vec<_>, _>>()?;
        accesses.sort_by_key(|a| a.at);
        Ok(Self { accesses })
    }

    /// Reads, parses and validates a workload file.
    pub fn load(path: &str) -> Result<Self, WorkloadError> {
        let text = fs::read_to_string(path).map_err(|source| WorkloadError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn accesses(&self) -> &[BusAccess] {
        &self.accesses
    }

    pub fn len(&self) -> usize {
        self.accesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accesses.is_empty()
    }
}

impl Step {
    /// Converts the step into a raw bus access.
    ///
    /// # Arguments
    ///
    /// * `index` - Position of the step in the file, used in error messages
    pub fn encode(&self, index: usize) -> Result<BusAccess, WorkloadError> {
        let width = AccessWidth::from_bytes(self.width).ok_or(WorkloadError::InvalidWidth {
            step: index,
            width: self.width,
        })?;
        let data = match (self.op, self.value) {
            (AccessType::Read, _) => 0,
            (AccessType::Write, None) => return Err(WorkloadError::MissingValue { step: index }),
            (AccessType::Write, Some(StepValue::Int(v))) => Payload::unsigned(width, v).to_raw(),
            (AccessType::Write, Some(StepValue::Float(v))) => Payload::encode_f64(v, width)
                .ok_or(WorkloadError::NarrowFloat { step: index })?,
        };
        Ok(BusAccess {
            at: self.at,
            op: self.op,
            addr: self.addr,
            width,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_stably_ordered_by_time() {
        let workload = Workload::from_toml_str(
            r#"
            [[step]]
            at = 20
            op = "read"
            addr = 0x10

            [[step]]
            at = 5
            op = "write"
            addr = 0x20
            value = 1

            [[step]]
            at = 5
            op = "write"
            addr = 0x30
            value = 2
            "#,
        )
        .unwrap();
        let addrs: Vec<u64> = workload.accesses().iter().map(|a| a.addr).collect();
        assert_eq!(addrs, vec![0x20, 0x30, 0x10]);
    }

    #[test]
    fn float_values_follow_the_width() {
        let workload = Workload::from_toml_str(
            r#"
            [[step]]
            op = "write"
            addr = 0
            value = 0.8

            [[step]]
            op = "write"
            addr = 0
            width = 8
            value = 0.8
            "#,
        )
        .unwrap();
        assert_eq!(workload.accesses()[0].data, u64::from(0.8f32.to_bits()));
        assert_eq!(workload.accesses()[1].data, 0.8f64.to_bits());
    }

    #[test]
    fn write_without_value_is_rejected() {
        let err = Workload::from_toml_str(
            r#"
            [[step]]
            op = "write"
            addr = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, WorkloadError::MissingValue { step: 0 }));
    }
}
