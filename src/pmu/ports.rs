//! Collaborator Seams.
//!
//! The controller is hosted by a discrete-event simulator it does not own.
//! These traits are everything it needs from that host: a way to read the
//! clock and schedule a one-shot callback, per-domain actuator sinks, and an
//! energy-accounting engine. All calls are fire-and-forget and execute on
//! the single simulation thread.

use super::domain::{DomainId, PowerState};

/// A one-shot timer scheduled by the controller for a domain transition.
///
/// The host hands it back to [`PowerManager::handle_timer`](super::PowerManager::handle_timer)
/// once the delay has elapsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerEvent {
    /// Domain whose transition expires.
    pub domain: DomainId,
    /// Domain epoch at scheduling time; a reset invalidates older events.
    pub epoch: u64,
}

/// Clock and event queue provided by the simulation host.
pub trait Scheduler {
    /// Current simulation time in ticks.
    fn now(&self) -> u64;

    /// Schedules `event` to be delivered `delay` ticks from now.
    fn schedule(&mut self, delay: u64, event: TimerEvent);
}

/// Sink for power-state changes of one domain.
pub trait PowerActuator {
    fn sync(&mut self, state: PowerState);
}

/// Sink for supply-voltage changes of one domain, in volts.
pub trait VoltageActuator {
    fn sync(&mut self, volts: f64);
}

/// Energy-accounting engine used by capture sessions.
pub trait EnergyEngine {
    /// Opens a capture window at `now`.
    fn start_capture(&mut self, now: u64);

    /// Closes the capture window at `now`.
    fn stop_capture(&mut self, now: u64);

    /// Average `(dynamic, static)` power in watts over the last closed window.
    fn average_power(&self) -> (f64, f64);
}

/// Actuator handles of one domain.
pub struct DomainPorts {
    pub power: Box<dyn PowerActuator>,
    pub voltage: Box<dyn VoltageActuator>,
}

impl DomainPorts {
    pub fn new(power: Box<dyn PowerActuator>, voltage: Box<dyn VoltageActuator>) -> Self {
        Self { power, voltage }
    }
}
