//! Power Management Unit.
//!
//! The controller behind the PMU register window. Bus writes are decoded by
//! the [`RegisterMap`] and routed to one of three paths:
//!
//! * **State**: a delayed transition. The delay is chosen from the domain's
//!   delay table, a one-shot timer is scheduled with the host, and the new
//!   state is applied to the actuator only when that timer fires. A domain
//!   accepts one transition at a time; requests arriving while one is in
//!   flight are dropped.
//! * **Voltage**: forwarded to the domain's voltage actuator immediately,
//!   independent of any transition in flight.
//! * **Capture**: start/stop of an energy capture window.
//!
//! Delay-config writes replace one delay-table entry and only affect
//! transitions scheduled afterwards. No access ever fails: unmapped
//! offsets and unusable widths are logged and ignored.

pub mod capture;
pub mod decoder;
pub mod domain;
pub mod ports;

pub use capture::{CaptureSession, MeasurementRecord};
pub use decoder::{Register, RegisterGroup, RegisterMap};
pub use domain::{
    DelayTable, DomainId, DomainRegistry, PendingTransition, PowerDomain, PowerState,
    TransitionKind,
};
pub use ports::{
    DomainPorts, EnergyEngine, PowerActuator, Scheduler, TimerEvent, VoltageActuator,
};

use log::{debug, info, warn};

use crate::common::{AccessWidth, ConfigError, Payload};
use crate::config::Config;
use crate::soc::Device;
use crate::stats::PmuStats;

/// Result of a state-control request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A timer was scheduled; the transition applies at `pending.fires_at`.
    Scheduled {
        kind: TransitionKind,
        delay: u64,
        pending: PendingTransition,
    },
    /// The domain already has a transition in flight; nothing changed.
    Dropped,
    /// The domain id does not belong to this controller.
    UnknownDomain,
}

/// The power management unit.
pub struct PowerManager {
    name: String,
    base: u64,
    size: u64,
    registers: RegisterMap,
    registry: DomainRegistry,
    capture: CaptureSession,
    engine: Box<dyn EnergyEngine>,
    stats: PmuStats,
}

impl PowerManager {
    /// Creates a power manager from configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - System configuration; its domain list fixes the registry
    /// * `ports` - Actuator handles, one entry per domain in configuration order
    /// * `engine` - Energy-accounting engine used by capture sessions
    ///
    /// # Returns
    ///
    /// The controller with every domain `Off` and nothing in flight, or a
    /// [`ConfigError`] if the configuration is invalid or the port count
    /// does not match the domain list.
    pub fn new(
        config: &Config,
        ports: Vec<DomainPorts>,
        engine: Box<dyn EnergyEngine>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if ports.len() != config.domains.len() {
            return Err(ConfigError::PortCount {
                expected: config.domains.len(),
                found: ports.len(),
            });
        }

        let domains = config
            .domains
            .iter()
            .zip(ports)
            .map(|(domain, ports)| PowerDomain::new(domain, ports))
            .collect();
        let registry = DomainRegistry::new(domains);

        Ok(Self {
            name: "PMU".to_string(),
            base: config.pmu.base,
            size: config.pmu.window_size(),
            registers: RegisterMap::new(&config.pmu, registry.len()),
            stats: PmuStats::new(registry.len()),
            registry,
            capture: CaptureSession::new(),
            engine,
        })
    }

    pub fn registers(&self) -> &RegisterMap {
        &self.registers
    }

    pub fn registry(&self) -> &DomainRegistry {
        &self.registry
    }

    pub fn domain(&self, id: DomainId) -> Option<&PowerDomain> {
        self.registry.get(id)
    }

    pub fn find_domain(&self, name: &str) -> Option<DomainId> {
        self.registry.find(name)
    }

    pub fn stats(&self) -> &PmuStats {
        &self.stats
    }

    pub fn capture(&self) -> &CaptureSession {
        &self.capture
    }

    /// Value returned by capture-control reads.
    pub fn last_average_power(&self) -> f64 {
        self.capture.last_average_power()
    }

    pub fn measurements(&self) -> &[MeasurementRecord] {
        self.capture.records()
    }

    pub fn take_measurements(&mut self) -> Vec<MeasurementRecord> {
        self.capture.take_records()
    }

    /// Requests a transition of `id` to `target`.
    ///
    /// If the domain is idle, the delay for the transition is read from its
    /// delay table and a timer is scheduled; the recorded state does not
    /// change until [`handle_timer`](Self::handle_timer) runs. If a
    /// transition is already in flight the request is dropped.
    pub fn request_transition(
        &mut self,
        id: DomainId,
        target: PowerState,
        sched: &mut dyn Scheduler,
    ) -> RequestOutcome {
        self.stats.state_requests += 1;
        let Some(domain) = self.registry.get_mut(id) else {
            warn!("no power domain with index {}", id.index());
            return RequestOutcome::UnknownDomain;
        };

        if let Some(pending) = domain.pending {
            self.stats.transitions_dropped += 1;
            debug!(
                "last change of {} is still in progress (to {} at {}), dropping request for {}",
                domain.name(),
                pending.target,
                pending.fires_at,
                target
            );
            return RequestOutcome::Dropped;
        }

        let kind = TransitionKind::for_request(domain.recorded_state, target);
        let delay = domain.delays.get(kind);
        let pending = PendingTransition {
            target,
            fires_at: sched.now().saturating_add(delay),
        };
        domain.pending = Some(pending);
        sched.schedule(
            delay,
            TimerEvent {
                domain: id,
                epoch: domain.epoch,
            },
        );
        self.stats.transitions_scheduled += 1;
        debug!(
            "{}: {} -> {} ({kind}) scheduled in {delay} ticks",
            domain.name(),
            domain.recorded_state,
            target
        );

        RequestOutcome::Scheduled {
            kind,
            delay,
            pending,
        }
    }

    /// Applies the transition whose timer fired.
    ///
    /// Drives the domain's power actuator to the pending target and records
    /// it. Expiries from before a reset, or for a domain with nothing in
    /// flight, are discarded.
    ///
    /// # Returns
    ///
    /// The applied state, or `None` if the event was discarded.
    pub fn handle_timer(&mut self, event: TimerEvent) -> Option<PowerState> {
        let Some(domain) = self.registry.get_mut(event.domain) else {
            warn!("timer for unknown power domain {}", event.domain.index());
            return None;
        };
        if event.epoch != domain.epoch {
            self.stats.stale_expiries += 1;
            debug!("{}: discarding expiry scheduled before reset", domain.name());
            return None;
        }
        let Some(pending) = domain.pending.take() else {
            warn!("{}: timer fired with no transition in flight", domain.name());
            return None;
        };

        domain.ports.power.sync(pending.target);
        domain.recorded_state = pending.target;
        info!("switching power state of {} to {}", domain.name(), pending.target);
        self.stats.record_applied(event.domain.index());
        Some(pending.target)
    }

    /// Forwards a supply voltage to the domain's voltage actuator.
    ///
    /// Takes effect immediately, whether or not a transition is in flight.
    ///
    /// # Returns
    ///
    /// `false` if the domain does not exist.
    pub fn set_voltage(&mut self, id: DomainId, volts: f64) -> bool {
        let Some(domain) = self.registry.get_mut(id) else {
            warn!("no power domain with index {}", id.index());
            return false;
        };
        domain.ports.voltage.sync(volts);
        self.stats.voltage_writes += 1;
        debug!("switching voltage of {} to {volts:.3}", domain.name());
        true
    }

    /// Replaces one entry of a domain's delay table.
    ///
    /// A transition already in flight keeps the delay it was scheduled with.
    pub fn set_delay(&mut self, id: DomainId, kind: TransitionKind, ticks: u64) -> bool {
        let Some(domain) = self.registry.get_mut(id) else {
            warn!("no power domain with index {}", id.index());
            return false;
        };
        domain.delays.set(kind, ticks);
        self.stats.delay_writes += 1;
        debug!("{}: new configuration is {}", domain.name(), domain.delays);
        true
    }

    /// Opens an energy capture window at the current time.
    pub fn start_capture(&mut self, sched: &dyn Scheduler) {
        self.capture.start(self.engine.as_mut(), sched.now());
        self.stats.captures_started += 1;
    }

    /// Closes the capture window and stores the average power.
    pub fn stop_capture(&mut self, sched: &dyn Scheduler) -> MeasurementRecord {
        let record = self.capture.stop(self.engine.as_mut(), sched.now());
        self.stats.captures_stopped += 1;
        record
    }

    /// Returns every domain to its reset state.
    ///
    /// Each power actuator is driven `Off`, every recorded state becomes
    /// `Off`, and transitions in flight are abandoned: their timers still
    /// arrive but are discarded.
    pub fn reset(&mut self) {
        for domain in self.registry.iter_mut() {
            domain.epoch += 1;
            domain.pending = None;
            domain.recorded_state = PowerState::Off;
            domain.ports.power.sync(PowerState::Off);
        }
        info!("power manager reset, all domains {}", PowerState::Off);
    }

    /// Handles a bus write at `offset` relative to the PMU base.
    pub fn write_register(
        &mut self,
        offset: u64,
        width: AccessWidth,
        raw: u64,
        sched: &mut dyn Scheduler,
    ) {
        debug!(
            "received write at offset {offset:#x}, size {}, data {raw:#x}",
            width.bytes()
        );
        match self.registers.decode(offset) {
            Some(Register::State(id)) => {
                let code = Payload::unsigned(width, raw).as_u64();
                self.request_transition(id, PowerState::from_code(code), sched);
            }
            Some(Register::Voltage(id)) => match Payload::floating(width, raw) {
                Some(volts) => {
                    self.set_voltage(id, volts.as_f64());
                }
                None => self.reject(offset, width),
            },
            Some(Register::Delay(id, kind)) => match Payload::word(width, raw) {
                Some(ticks) => {
                    self.set_delay(id, kind, ticks.as_u64());
                }
                None => self.reject(offset, width),
            },
            Some(Register::Capture) => {
                if Payload::unsigned(width, raw).as_u64() & 1 == 1 {
                    self.start_capture(sched);
                } else {
                    self.stop_capture(sched);
                }
            }
            None => {
                self.stats.unmapped_accesses += 1;
                warn!("no register associated with offset {offset:#x}, write ignored");
            }
        }
    }

    /// Handles a bus read at `offset` relative to the PMU base.
    ///
    /// State-control slots echo the recorded state code and the capture
    /// register returns the last average power. Every other read returns 0.
    pub fn read_register(&mut self, offset: u64, width: AccessWidth) -> u64 {
        self.stats.reads += 1;
        match self.registers.decode(offset) {
            Some(Register::State(id)) => self
                .registry
                .get(id)
                .map(|d| width.mask(d.recorded_state.code()))
                .unwrap_or(0),
            Some(Register::Capture) => {
                let power = self.capture.last_average_power();
                match Payload::encode_f64(power, width) {
                    Some(raw) => {
                        debug!("returning {power:.6}");
                        raw
                    }
                    None => {
                        self.reject(offset, width);
                        0
                    }
                }
            }
            Some(register) => {
                debug!("{register:?} is write-only, read returns 0");
                0
            }
            None => {
                self.stats.unmapped_accesses += 1;
                warn!("no register associated with offset {offset:#x}, read returns 0");
                0
            }
        }
    }

    fn reject(&mut self, offset: u64, width: AccessWidth) {
        self.stats.rejected_accesses += 1;
        warn!(
            "{}-byte access cannot be handled by register at offset {offset:#x}, ignored",
            width.bytes()
        );
    }
}

impl Device for PowerManager {
    fn name(&self) -> &str {
        &self.name
    }

    fn address_range(&self) -> (u64, u64) {
        (self.base, self.size)
    }

    fn read(&mut self, offset: u64, width: AccessWidth, _sched: &mut dyn Scheduler) -> u64 {
        self.read_register(offset, width)
    }

    fn write(&mut self, offset: u64, width: AccessWidth, data: u64, sched: &mut dyn Scheduler) {
        self.write_register(offset, width, data, sched);
    }

    fn as_power_manager(&self) -> Option<&PowerManager> {
        Some(self)
    }

    fn as_power_manager_mut(&mut self) -> Option<&mut PowerManager> {
        Some(self)
    }
}
