//! Energy Capture Session.
//!
//! Start/stop bookkeeping around the host's energy-accounting engine. Every
//! stop closes the engine's window, stores the average dynamic plus static
//! power it reports, and emits a timestamped [`MeasurementRecord`]. The stored
//! value survives until the next stop overwrites it.

use log::{info, warn};
use serde::Serialize;

use super::ports::EnergyEngine;

/// One closed capture window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MeasurementRecord {
    /// Simulation time at which the window was closed.
    pub timestamp: u64,
    /// Time at which the window was opened; `None` for a stop without a start.
    pub started_at: Option<u64>,
    /// Dynamic plus static average power in watts.
    pub average_power: f64,
    pub dynamic_power: f64,
    pub static_power: f64,
}

#[derive(Debug, Default)]
pub struct CaptureSession {
    started_at: Option<u64>,
    last_average_power: f64,
    records: Vec<MeasurementRecord>,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Most recent average power; 0.0 before the first completed window.
    pub fn last_average_power(&self) -> f64 {
        self.last_average_power
    }

    /// Opens a capture window. Starting an active session restarts its window.
    pub fn start(&mut self, engine: &mut dyn EnergyEngine, now: u64) {
        if let Some(previous) = self.started_at {
            warn!("capture already active since {previous}, restarting window at {now}");
        }
        engine.start_capture(now);
        self.started_at = Some(now);
    }

    /// Closes the capture window and records the average power.
    ///
    /// A stop without a preceding start is still forwarded to the engine and
    /// records whatever average the engine reports.
    pub fn stop(&mut self, engine: &mut dyn EnergyEngine, now: u64) -> MeasurementRecord {
        let started_at = self.started_at.take();
        if started_at.is_none() {
            warn!("capture stop at {now} without a preceding start");
        }
        engine.stop_capture(now);
        let (dynamic_power, static_power) = engine.average_power();
        self.last_average_power = dynamic_power + static_power;

        let record = MeasurementRecord {
            timestamp: now,
            started_at,
            average_power: self.last_average_power,
            dynamic_power,
            static_power,
        };
        info!(target: "power.measure", "@power.measure_{}@{:.6}@", now, record.average_power);
        self.records.push(record);
        record
    }

    /// Records emitted so far.
    pub fn records(&self) -> &[MeasurementRecord] {
        &self.records
    }

    /// Drains the emitted records.
    pub fn take_records(&mut self) -> Vec<MeasurementRecord> {
        std::mem::take(&mut self.records)
    }
}
