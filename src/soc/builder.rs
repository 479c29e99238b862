//! System-on-Chip (SoC) Builder.
//!
//! This module defines the `System` structure, which acts as the container
//! for the simulated platform: the bus with the PMU and sensors attached,
//! one power rail per domain, the event queue that delivers the PMU's
//! timers, and the energy meter behind its capture sessions. It handles the
//! initialization and wiring of the system based on the provided
//! configuration.

use log::info;

use crate::common::{AccessType, AccessWidth, ConfigError};
use crate::config::Config;
use crate::pmu::{DomainPorts, PowerManager, TimerEvent};
use crate::sim::{BusAccess, EnergyMeter, EventQueue, SharedMeter};
use crate::soc::devices::Sensor;
use crate::soc::interconnect::Bus;
use crate::soc::rail::PowerRail;

/// System-on-Chip (SoC) structure containing all system components.
pub struct System {
    /// System interconnect bus for device communication.
    pub bus: Bus,
    /// Simulation clock and pending PMU timers.
    pub queue: EventQueue<TimerEvent>,
    meter: SharedMeter,
    rails: Vec<PowerRail>,
}

impl System {
    /// Creates a new system instance with the specified configuration.
    ///
    /// Builds one power rail per configured domain, hands each rail to the
    /// PMU as both its power-state and voltage actuator, attaches the
    /// sensors to the rails of their domains, and registers every rail with
    /// the energy meter.
    ///
    /// # Arguments
    ///
    /// * `config` - System configuration specifying the domains, the PMU
    ///   register map and the sensors
    ///
    /// # Returns
    ///
    /// A new `System` at time 0 with every domain `Off`, or the
    /// configuration error that prevented building it.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let meter = EnergyMeter::new(config.general.tick_seconds).shared();
        let rails: Vec<PowerRail> = config
            .domains
            .iter()
            .map(|d| PowerRail::new(&d.name, d.initial_voltage, d.power.clone()))
            .collect();
        for rail in &rails {
            meter.borrow_mut().add_rail(rail.clone());
        }

        let ports = rails
            .iter()
            .map(|rail| DomainPorts::new(Box::new(rail.clone()), Box::new(rail.clone())))
            .collect();
        let pmu = PowerManager::new(config, ports, Box::new(meter.clone()))?;

        let mut bus = Bus::new();
        bus.add_device(Box::new(pmu));

        for (i, sensor) in config.sensors.iter().enumerate() {
            let rail = config
                .domains
                .iter()
                .position(|d| d.name == sensor.domain)
                .map(|idx| rails[idx].clone())
                .ok_or_else(|| ConfigError::UnknownDomain {
                    sensor: sensor.name.clone(),
                    domain: sensor.domain.clone(),
                })?;
            let seed = config.general.seed.wrapping_add(i as u64);
            bus.add_device(Box::new(Sensor::new(
                &sensor.name,
                sensor.base,
                sensor.size,
                rail,
                seed,
            )));
        }

        info!(
            "system ready: {} power domains, {} sensors",
            rails.len(),
            config.sensors.len()
        );

        Ok(Self {
            bus,
            queue: EventQueue::new(),
            meter,
            rails,
        })
    }

    /// Current simulation time in ticks.
    pub fn now(&self) -> u64 {
        self.queue.now()
    }

    /// The power manager on the bus.
    pub fn pmu(&self) -> Option<&PowerManager> {
        self.bus.power_manager()
    }

    pub fn pmu_mut(&mut self) -> Option<&mut PowerManager> {
        self.bus.power_manager_mut()
    }

    /// The supply rail of the named domain.
    pub fn rail(&self, name: &str) -> Option<&PowerRail> {
        self.rails.iter().find(|r| r.name() == name)
    }

    pub fn rails(&self) -> &[PowerRail] {
        &self.rails
    }

    pub fn meter(&self) -> &SharedMeter {
        &self.meter
    }

    /// Reads from the bus at the current time.
    pub fn read(&mut self, addr: u64, width: AccessWidth) -> u64 {
        self.meter.borrow_mut().advance(self.queue.now());
        self.bus.read(addr, width, &mut self.queue)
    }

    /// Writes to the bus at the current time.
    pub fn write(&mut self, addr: u64, width: AccessWidth, data: u64) {
        self.meter.borrow_mut().advance(self.queue.now());
        self.bus.write(addr, width, data, &mut self.queue);
    }

    /// Runs the simulation up to `time`.
    ///
    /// Every timer due at or before `time` is delivered to the PMU in
    /// firing order, with energy integrated up to each firing before the
    /// rail changes state. The clock then rests at `time`.
    pub fn advance_to(&mut self, time: u64) {
        while let Some((fired_at, event)) = self.queue.pop_due(time) {
            self.meter.borrow_mut().advance(fired_at);
            if let Some(pmu) = self.bus.power_manager_mut() {
                pmu.handle_timer(event);
            }
        }
        self.queue.advance_to(time);
        self.meter.borrow_mut().advance(self.queue.now());
    }

    /// Delivers every pending timer.
    ///
    /// # Returns
    ///
    /// The simulation time after the last delivery.
    pub fn run_until_idle(&mut self) -> u64 {
        while let Some(time) = self.queue.next_time() {
            self.advance_to(time);
        }
        self.queue.now()
    }

    /// Resets the PMU at the current time.
    pub fn reset(&mut self) {
        self.meter.borrow_mut().advance(self.queue.now());
        if let Some(pmu) = self.bus.power_manager_mut() {
            pmu.reset();
        }
    }

    /// Runs up to the access's issue time, then performs it.
    ///
    /// # Returns
    ///
    /// The value read, or `None` for a write.
    pub fn execute(&mut self, access: &BusAccess) -> Option<u64> {
        self.advance_to(access.at);
        match access.op {
            AccessType::Read => Some(self.read(access.addr, access.width)),
            AccessType::Write => {
                self.write(access.addr, access.width, access.data);
                None
            }
        }
    }
}
