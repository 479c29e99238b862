//! Bus Access Types.
//!
//! This module defines the classification of bus accesses used throughout
//! the simulator. Every register-mapped access carries a direction and a
//! width; the register decoder uses both to validate the payload once at
//! the device boundary.

use serde::Deserialize;

/// Direction of a bus access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    /// Data read access.
    ///
    /// The device produces a value which is returned to the initiator.
    Read,

    /// Data write access.
    ///
    /// The initiator supplies a value which the device consumes.
    Write,
}

/// Width of a bus access in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessWidth {
    /// 8-bit access.
    Byte,
    /// 16-bit access.
    Half,
    /// 32-bit access.
    Word,
    /// 64-bit access.
    Double,
}

impl AccessWidth {
    /// Returns the access width for a size in bytes.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Access size in bytes (1, 2, 4 or 8)
    ///
    /// # Returns
    ///
    /// `Some(width)` for a supported size, `None` otherwise.
    pub fn from_bytes(bytes: u64) -> Option<Self> {
        match bytes {
            1 => Some(Self::Byte),
            2 => Some(Self::Half),
            4 => Some(Self::Word),
            8 => Some(Self::Double),
            _ => None,
        }
    }

    /// Returns the access size in bytes.
    pub fn bytes(self) -> u64 {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
            Self::Double => 8,
        }
    }

    /// Truncates a raw bus value to this width.
    pub fn mask(self, raw: u64) -> u64 {
        match self {
            Self::Byte => raw & 0xFF,
            Self::Half => raw & 0xFFFF,
            Self::Word => raw & 0xFFFF_FFFF,
            Self::Double => raw,
        }
    }
}
