//! Tagged Register Payloads.
//!
//! The bus moves raw little-endian words. Registers interpret those words
//! differently (a 2-bit state code, a single or double precision voltage,
//! a 32-bit delay), so the decoder converts the raw word into a
//! [`Payload`] exactly once, at the device boundary, using the access width
//! to pick the interpretation. Accesses whose width does not fit the
//! register are rejected there and never reach the controller.

use super::data::AccessWidth;

/// A register value together with its interpretation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Payload {
    /// Unsigned integer, already truncated to the access width.
    Unsigned(u64),
    /// IEEE 754 single precision value (4-byte access).
    Float(f32),
    /// IEEE 754 double precision value (8-byte access).
    Double(f64),
}

impl Payload {
    /// Interprets a raw bus word as an unsigned integer of the given width.
    pub fn unsigned(width: AccessWidth, raw: u64) -> Self {
        Self::Unsigned(width.mask(raw))
    }

    /// Interprets a raw bus word as a floating-point value.
    ///
    /// A 4-byte access carries an `f32`, an 8-byte access an `f64`.
    ///
    /// # Returns
    ///
    /// `None` for byte and half-word accesses, which cannot carry a float.
    pub fn floating(width: AccessWidth, raw: u64) -> Option<Self> {
        match width {
            AccessWidth::Word => Some(Self::Float(f32::from_bits(raw as u32))),
            AccessWidth::Double => Some(Self::Double(f64::from_bits(raw))),
            AccessWidth::Byte | AccessWidth::Half => None,
        }
    }

    /// Interprets a raw bus word as a 32-bit or wider unsigned integer.
    ///
    /// # Returns
    ///
    /// `None` for byte and half-word accesses.
    pub fn word(width: AccessWidth, raw: u64) -> Option<Self> {
        match width {
            AccessWidth::Word | AccessWidth::Double => Some(Self::unsigned(width, raw)),
            AccessWidth::Byte | AccessWidth::Half => None,
        }
    }

    /// Returns the value as an unsigned integer.
    ///
    /// Floating-point payloads are truncated toward zero.
    pub fn as_u64(self) -> u64 {
        match self {
            Self::Unsigned(v) => v,
            Self::Float(v) => v as u64,
            Self::Double(v) => v as u64,
        }
    }

    /// Returns the value as a double precision float.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Unsigned(v) => v as f64,
            Self::Float(v) => f64::from(v),
            Self::Double(v) => v,
        }
    }

    /// Encodes a double for a read of the given width.
    ///
    /// An 8-byte read returns the `f64` bit pattern, a 4-byte read the
    /// `f32` bit pattern. Narrower reads cannot carry a float.
    pub fn encode_f64(value: f64, width: AccessWidth) -> Option<u64> {
        match width {
            AccessWidth::Double => Some(value.to_bits()),
            AccessWidth::Word => Some(u64::from((value as f32).to_bits())),
            AccessWidth::Byte | AccessWidth::Half => None,
        }
    }

    /// Returns the raw bus word for this payload.
    pub fn to_raw(self) -> u64 {
        match self {
            Self::Unsigned(v) => v,
            Self::Float(v) => u64::from(v.to_bits()),
            Self::Double(v) => v.to_bits(),
        }
    }
}
