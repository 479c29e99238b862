//! System-on-Chip components.
//!
//! The bus, the devices attached to it, the power rails the PMU drives, and
//! the [`System`] that wires them together.

pub mod builder;
pub mod devices;
pub mod interconnect;
pub mod rail;
pub mod traits;

pub use builder::System;
pub use interconnect::Bus;
pub use rail::PowerRail;
pub use traits::Device;
