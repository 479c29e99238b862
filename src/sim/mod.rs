//! Simulation host.
//!
//! The pieces of the surrounding platform the PMU runs against: the event
//! queue that delivers its timers, the energy meter behind its capture
//! sessions, and the workload loader that feeds bus traffic.

pub mod energy;
pub mod event;
pub mod loader;

pub use energy::{EnergyMeter, SharedMeter};
pub use event::EventQueue;
pub use loader::{BusAccess, Step, StepValue, Workload};
