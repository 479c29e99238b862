//! Power Rails.
//!
//! A rail is the supply of one power domain as seen by the blocks it feeds.
//! The PMU drives it through the actuator traits, devices in the domain
//! charge access energy to it, and the energy meter samples its power draw.
//! All three hold clones of the same handle; the simulation is single
//! threaded, so the shared state lives in an `Rc<RefCell<_>>`.

use std::cell::RefCell;
use std::rc::Rc;

use log::trace;

use crate::config::PowerProfileConfig;
use crate::pmu::{PowerActuator, PowerState, VoltageActuator};

#[derive(Debug)]
struct RailState {
    name: String,
    state: PowerState,
    volts: f64,
    profile: Option<PowerProfileConfig>,
    power_syncs: u64,
    voltage_syncs: u64,
    /// Access energy charged since the meter last drained it, in picojoules.
    pending_access_pj: f64,
}

/// Shared handle to a domain supply.
#[derive(Clone, Debug)]
pub struct PowerRail(Rc<RefCell<RailState>>);

impl PowerRail {
    /// Creates a rail in the `Off` state.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the domain the rail supplies
    /// * `volts` - Initial supply voltage
    /// * `profile` - Power characteristics of the blocks on the rail
    pub fn new(name: &str, volts: f64, profile: Option<PowerProfileConfig>) -> Self {
        Self(Rc::new(RefCell::new(RailState {
            name: name.to_string(),
            state: PowerState::Off,
            volts,
            profile,
            power_syncs: 0,
            voltage_syncs: 0,
            pending_access_pj: 0.0,
        })))
    }

    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    /// Power state last applied by the PMU.
    pub fn state(&self) -> PowerState {
        self.0.borrow().state
    }

    /// Supply voltage last applied by the PMU, in volts.
    pub fn voltage(&self) -> f64 {
        self.0.borrow().volts
    }

    /// Number of times the power-state sink was invoked.
    pub fn power_sync_count(&self) -> u64 {
        self.0.borrow().power_syncs
    }

    /// Number of times the voltage sink was invoked.
    pub fn voltage_sync_count(&self) -> u64 {
        self.0.borrow().voltage_syncs
    }

    /// Current `(leakage, dynamic)` draw in watts.
    ///
    /// Leakage is drawn whenever the rail is not `Off`; background dynamic
    /// power only while it is `On`.
    pub fn power_watts(&self) -> (f64, f64) {
        let rail = self.0.borrow();
        let Some(profile) = &rail.profile else {
            return (0.0, 0.0);
        };
        let leakage = match rail.state {
            PowerState::Off => 0.0,
            PowerState::On | PowerState::ClockGated => profile.leakage.at_volts(rail.volts),
        };
        let dynamic = match rail.state {
            PowerState::On => profile.dynamic.at_volts(rail.volts),
            PowerState::Off | PowerState::ClockGated => 0.0,
        };
        (leakage, dynamic)
    }

    /// Charges the energy of one device access to the rail.
    ///
    /// Accesses to an unpowered rail cost nothing.
    pub fn charge_access(&self) {
        let mut rail = self.0.borrow_mut();
        if rail.state == PowerState::Off {
            return;
        }
        if let Some(profile) = &rail.profile {
            let quantum = profile.access.at_volts(rail.volts);
            rail.pending_access_pj += quantum;
        }
    }

    /// Drains the access energy charged so far, in picojoules.
    pub fn take_access_energy_pj(&self) -> f64 {
        std::mem::take(&mut self.0.borrow_mut().pending_access_pj)
    }
}

impl PowerActuator for PowerRail {
    fn sync(&mut self, state: PowerState) {
        let mut rail = self.0.borrow_mut();
        rail.state = state;
        rail.power_syncs += 1;
        trace!("{}: power state {}", rail.name, state);
    }
}

impl VoltageActuator for PowerRail {
    fn sync(&mut self, volts: f64) {
        let mut rail = self.0.borrow_mut();
        rail.volts = volts;
        rail.voltage_syncs += 1;
        trace!("{}: voltage {volts:.3}", rail.name);
    }
}
