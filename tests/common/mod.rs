//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use soc_pmu::config::{Config, DomainConfig};
use soc_pmu::pmu::{DomainPorts, EnergyEngine, PowerManager};
use soc_pmu::sim::EventQueue;
use soc_pmu::pmu::TimerEvent;
use soc_pmu::soc::PowerRail;

/// Calls made to a [`SyntheticEngine`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EngineLog {
    pub starts: Vec<u64>,
    pub stops: Vec<u64>,
}

/// Energy engine returning a fixed `(dynamic, static)` average.
pub struct SyntheticEngine {
    pub average: (f64, f64),
    pub log: Rc<RefCell<EngineLog>>,
}

impl SyntheticEngine {
    pub fn new(dynamic: f64, leakage: f64) -> (Self, Rc<RefCell<EngineLog>>) {
        let log = Rc::new(RefCell::new(EngineLog::default()));
        (
            Self {
                average: (dynamic, leakage),
                log: log.clone(),
            },
            log,
        )
    }
}

impl EnergyEngine for SyntheticEngine {
    fn start_capture(&mut self, now: u64) {
        self.log.borrow_mut().starts.push(now);
    }

    fn stop_capture(&mut self, now: u64) {
        self.log.borrow_mut().stops.push(now);
    }

    fn average_power(&self) -> (f64, f64) {
        self.average
    }
}

/// Configuration with the given domains and no sensors.
pub fn config_with(domains: &[(&str, [u64; 4])]) -> Config {
    Config {
        domains: domains
            .iter()
            .map(|(name, delays)| DomainConfig {
                delays: *delays,
                ..DomainConfig::new(name)
            })
            .collect(),
        sensors: Vec::new(),
        ..Config::default()
    }
}

/// Controller under test with one rail per domain.
pub struct Harness {
    pub pmu: PowerManager,
    pub rails: Vec<PowerRail>,
    pub queue: EventQueue<TimerEvent>,
    pub engine_log: Rc<RefCell<EngineLog>>,
}

impl Harness {
    pub fn new(config: &Config, average: (f64, f64)) -> Self {
        let rails: Vec<PowerRail> = config
            .domains
            .iter()
            .map(|d| PowerRail::new(&d.name, d.initial_voltage, d.power.clone()))
            .collect();
        let ports = rails
            .iter()
            .map(|r| DomainPorts::new(Box::new(r.clone()), Box::new(r.clone())))
            .collect();
        let (engine, engine_log) = SyntheticEngine::new(average.0, average.1);
        let pmu = PowerManager::new(config, ports, Box::new(engine)).unwrap();
        Self {
            pmu,
            rails,
            queue: EventQueue::new(),
            engine_log,
        }
    }

    /// Delivers every timer due at or before `time`.
    pub fn run_to(&mut self, time: u64) {
        while let Some((_, event)) = self.queue.pop_due(time) {
            self.pmu.handle_timer(event);
        }
        self.queue.advance_to(time);
    }
}

/// The four default domains with the given host delays.
pub fn default_harness(host_delays: [u64; 4]) -> Harness {
    let config = config_with(&[
        ("host", host_delays),
        ("sensor1", [1; 4]),
        ("sensor2", [1; 4]),
        ("sensor3", [1; 4]),
    ]);
    Harness::new(&config, (0.0, 0.0))
}
