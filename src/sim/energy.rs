//! Energy accounting.
//!
//! [`EnergyMeter`] integrates the power drawn by every registered rail over
//! simulated time. The host calls [`EnergyMeter::advance`] before each
//! event and bus access, so the draw is constant over every integrated
//! interval and the integral is exact. Capture windows are differences of
//! the running totals.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::pmu::EnergyEngine;
use crate::soc::PowerRail;

/// Joules per picojoule.
const PJ: f64 = 1e-12;

#[derive(Clone, Copy, Debug)]
struct Window {
    start: u64,
    dynamic_j: f64,
    static_j: f64,
}

/// Running energy totals for a set of power rails.
#[derive(Debug)]
pub struct EnergyMeter {
    rails: Vec<PowerRail>,
    /// Length of one simulation tick in seconds.
    tick_seconds: f64,
    last_update: u64,
    dynamic_j: f64,
    static_j: f64,
    window: Option<Window>,
    last_average: (f64, f64),
}

/// Meter handle shared between the host and the power manager.
pub type SharedMeter = Rc<RefCell<EnergyMeter>>;

impl EnergyMeter {
    /// Creates a meter with no rails.
    ///
    /// # Arguments
    ///
    /// * `tick_seconds` - Duration of one simulation tick in seconds
    pub fn new(tick_seconds: f64) -> Self {
        Self {
            rails: Vec::new(),
            tick_seconds,
            last_update: 0,
            dynamic_j: 0.0,
            static_j: 0.0,
            window: None,
            last_average: (0.0, 0.0),
        }
    }

    pub fn shared(self) -> SharedMeter {
        Rc::new(RefCell::new(self))
    }

    pub fn add_rail(&mut self, rail: PowerRail) {
        self.rails.push(rail);
    }

    /// Total `(dynamic, static)` energy in joules since time 0.
    pub fn totals(&self) -> (f64, f64) {
        (self.dynamic_j, self.static_j)
    }

    pub fn is_capturing(&self) -> bool {
        self.window.is_some()
    }

    /// Integrates every rail's draw from the last update up to `now`.
    ///
    /// Access energy charged to the rails since the last update is added to
    /// the dynamic total. Calls with a time in the past only drain access
    /// energy.
    pub fn advance(&mut self, now: u64) {
        let seconds = now.saturating_sub(self.last_update) as f64 * self.tick_seconds;
        for rail in &self.rails {
            let (leakage, dynamic) = rail.power_watts();
            self.static_j += leakage * seconds;
            self.dynamic_j += dynamic * seconds + rail.take_access_energy_pj() * PJ;
        }
        self.last_update = self.last_update.max(now);
    }
}

impl EnergyEngine for EnergyMeter {
    fn start_capture(&mut self, now: u64) {
        self.advance(now);
        self.window = Some(Window {
            start: now,
            dynamic_j: self.dynamic_j,
            static_j: self.static_j,
        });
        debug!("energy capture opened at {now}");
    }

    fn stop_capture(&mut self, now: u64) {
        self.advance(now);
        let Some(window) = self.window.take() else {
            return;
        };
        let seconds = now.saturating_sub(window.start) as f64 * self.tick_seconds;
        self.last_average = if seconds > 0.0 {
            (
                (self.dynamic_j - window.dynamic_j) / seconds,
                (self.static_j - window.static_j) / seconds,
            )
        } else {
            (0.0, 0.0)
        };
        debug!(
            "energy capture closed at {now}: dynamic {:.9} W, static {:.9} W",
            self.last_average.0, self.last_average.1
        );
    }

    fn average_power(&self) -> (f64, f64) {
        self.last_average
    }
}

impl EnergyEngine for SharedMeter {
    fn start_capture(&mut self, now: u64) {
        self.borrow_mut().start_capture(now);
    }

    fn stop_capture(&mut self, now: u64) {
        self.borrow_mut().stop_capture(now);
    }

    fn average_power(&self) -> (f64, f64) {
        self.borrow().average_power()
    }
}
