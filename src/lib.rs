//! SoC Power Management Unit Simulator Library.
//!
//! This crate models the power management unit of a small SoC together with
//! just enough platform around it to drive it: a bus, per-domain power
//! rails, a few sensor peripherals, a discrete-event clock and an energy
//! meter.
//!
//! # Architecture
//!
//! * **PMU**: register decoder, per-domain delayed state transitions
//!   (`Off`, `On`, `ClockGated`), immediate voltage control, configurable
//!   transition delays and energy capture windows.
//! * **Host**: event queue delivering the PMU's one-shot timers, energy
//!   meter integrating rail power, TOML workloads of timed bus accesses.
//! * **SoC**: bus interconnect, power rails and sensors.
//!
//! # Modules
//!
//! * `common`: Bus access types, register payloads and error types.
//! * `config`: Configuration loading and validation.
//! * `pmu`: The power management unit.
//! * `sim`: Event queue, energy meter and workload loader.
//! * `soc`: Bus, devices, power rails and system assembly.
//! * `stats`: Controller statistics.

/// Shared types: bus access vocabulary, register payloads, errors.
pub mod common;

/// Configuration system for the PMU register map, power domains and sensors.
///
/// Loads and validates TOML configuration files describing the simulated
/// platform.
pub mod config;

/// Power management unit: register decoding, power domains, transitions,
/// voltage control and energy capture.
pub mod pmu;

/// Simulation host: event queue, energy meter and workload loader.
pub mod sim;

/// System-on-Chip components and system assembly.
pub mod soc;

/// Controller statistics collection and reporting.
pub mod stats;
