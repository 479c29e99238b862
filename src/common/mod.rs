//! Common types shared by the PMU controller and the simulation host.
//!
//! This module provides the bus access vocabulary (direction and width),
//! the tagged payload type that register decoding produces, and the error
//! types used when loading configuration and workloads.

/// Bus access direction and width definitions.
pub mod data;

/// Configuration and workload error types.
pub mod error;

/// Tagged register payloads.
pub mod payload;

pub use data::{AccessType, AccessWidth};
pub use error::{ConfigError, WorkloadError};
pub use payload::Payload;
