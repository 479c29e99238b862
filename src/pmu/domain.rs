//! Power Domain Registry.
//!
//! A fixed set of named power domains, created once from configuration and
//! living for the whole simulation. Each domain carries the state last
//! applied to its actuator, the transition currently in flight (if any),
//! and its delay table.

use std::fmt;

use super::ports::DomainPorts;
use crate::config::DomainConfig;

/// Power state of a domain, as applied to its power actuator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerState {
    /// Supply removed.
    Off,
    /// Supplied and clocked.
    On,
    /// Supplied, clock stopped.
    ClockGated,
}

impl PowerState {
    /// Decodes the 2-bit state-control code.
    ///
    /// Codes 0 and 2 both select `Off`; 1 selects `ClockGated` and 3 `On`.
    /// Bits above the low two are ignored.
    pub fn from_code(code: u64) -> Self {
        match code & 0b11 {
            1 => Self::ClockGated,
            3 => Self::On,
            _ => Self::Off,
        }
    }

    /// Returns the canonical register code for this state.
    pub fn code(self) -> u64 {
        match self {
            Self::Off => 0,
            Self::ClockGated => 1,
            Self::On => 3,
        }
    }

    /// Returns the display name used in traces.
    pub fn name(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
            Self::ClockGated => "ON CLOCK GATED",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four modeled transitions, in delay-table order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    OnToOff,
    OffToOn,
    OnToClockGated,
    ClockGatedToOn,
}

impl TransitionKind {
    /// All kinds in delay-table (and delay-config sub-slot) order.
    pub const ALL: [TransitionKind; 4] = [
        Self::OnToOff,
        Self::OffToOn,
        Self::OnToClockGated,
        Self::ClockGatedToOn,
    ];

    /// Index of this kind in the delay table.
    pub fn index(self) -> usize {
        match self {
            Self::OnToOff => 0,
            Self::OffToOn => 1,
            Self::OnToClockGated => 2,
            Self::ClockGatedToOn => 3,
        }
    }

    /// Returns the kind stored at a delay-table index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Selects which delay governs a request for `target` from `current`.
    ///
    /// Any request for `Off` uses on→off and any request for `ClockGated`
    /// uses on→clock-gated, whatever the current state. A request for `On`
    /// uses off→on from `Off` and clock-gated→on otherwise (including
    /// `On` to `On`).
    pub fn for_request(current: PowerState, target: PowerState) -> Self {
        match target {
            PowerState::Off => Self::OnToOff,
            PowerState::ClockGated => Self::OnToClockGated,
            PowerState::On if current == PowerState::Off => Self::OffToOn,
            PowerState::On => Self::ClockGatedToOn,
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OnToOff => "on-off",
            Self::OffToOn => "off-on",
            Self::OnToClockGated => "on-cg",
            Self::ClockGatedToOn => "cg-on",
        })
    }
}

/// Per-domain transition delays, in simulation ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelayTable([u64; 4]);

impl DelayTable {
    pub fn new(delays: [u64; 4]) -> Self {
        Self(delays)
    }

    pub fn get(&self, kind: TransitionKind) -> u64 {
        self.0[kind.index()]
    }

    pub fn set(&mut self, kind: TransitionKind, ticks: u64) {
        self.0[kind.index()] = ticks;
    }

    pub fn as_array(&self) -> [u64; 4] {
        self.0
    }
}

impl fmt::Display for DelayTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "on-off: {}, off-on: {}, on-cg: {}, cg-on: {}",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// Index of a domain in registry order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainId(usize);

impl DomainId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// A scheduled, not yet applied, state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingTransition {
    /// State the expiry will apply.
    pub target: PowerState,
    /// Absolute time of the expiry.
    pub fires_at: u64,
}

/// An independently power-controlled block.
pub struct PowerDomain {
    name: String,
    pub(crate) recorded_state: PowerState,
    pub(crate) pending: Option<PendingTransition>,
    pub(crate) delays: DelayTable,
    /// Incremented on reset so that expiries scheduled earlier are discarded.
    pub(crate) epoch: u64,
    pub(crate) ports: DomainPorts,
}

impl PowerDomain {
    /// Creates a domain in the reset state (`Off`, nothing in flight).
    pub fn new(config: &DomainConfig, ports: DomainPorts) -> Self {
        Self {
            name: config.name.clone(),
            recorded_state: PowerState::Off,
            pending: None,
            delays: DelayTable::new(config.delays),
            epoch: 0,
            ports,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// State last applied to the power actuator.
    pub fn recorded_state(&self) -> PowerState {
        self.recorded_state
    }

    /// Transition scheduled but not yet applied, if any.
    pub fn pending(&self) -> Option<PendingTransition> {
        self.pending
    }

    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    pub fn delays(&self) -> &DelayTable {
        &self.delays
    }
}

impl fmt::Debug for PowerDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowerDomain")
            .field("name", &self.name)
            .field("recorded_state", &self.recorded_state)
            .field("pending", &self.pending)
            .field("delays", &self.delays)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

/// The closed set of domains, in configuration order.
#[derive(Debug, Default)]
pub struct DomainRegistry {
    domains: Vec<PowerDomain>,
}

impl DomainRegistry {
    pub fn new(domains: Vec<PowerDomain>) -> Self {
        Self { domains }
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn get(&self, id: DomainId) -> Option<&PowerDomain> {
        self.domains.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: DomainId) -> Option<&mut PowerDomain> {
        self.domains.get_mut(id.0)
    }

    /// Looks a domain up by name.
    pub fn find(&self, name: &str) -> Option<DomainId> {
        self.domains
            .iter()
            .position(|d| d.name == name)
            .map(DomainId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DomainId, &PowerDomain)> {
        self.domains
            .iter()
            .enumerate()
            .map(|(i, d)| (DomainId(i), d))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut PowerDomain> {
        self.domains.iter_mut()
    }
}
