//! Controller statistics collection and reporting.
//!
//! Tracks how bus traffic was handled by the PMU: accepted and dropped
//! transition requests, applied transitions, voltage and delay writes,
//! capture windows and accesses that decoded to nothing.

use crate::pmu::DomainRegistry;

/// Counters maintained by the power manager.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PmuStats {
    pub state_requests: u64,
    pub transitions_scheduled: u64,
    pub transitions_dropped: u64,
    pub transitions_applied: u64,
    /// Expiries discarded because the domain was reset after scheduling.
    pub stale_expiries: u64,

    pub voltage_writes: u64,
    pub delay_writes: u64,

    pub captures_started: u64,
    pub captures_stopped: u64,

    pub reads: u64,
    pub unmapped_accesses: u64,
    /// Accesses to a mapped register with a width it cannot carry.
    pub rejected_accesses: u64,

    /// Applied transitions per domain, in registry order.
    pub applied_per_domain: Vec<u64>,
}

impl PmuStats {
    pub fn new(domains: usize) -> Self {
        Self {
            applied_per_domain: vec![0; domains],
            ..Self::default()
        }
    }

    pub(crate) fn record_applied(&mut self, domain: usize) {
        self.transitions_applied += 1;
        if let Some(count) = self.applied_per_domain.get_mut(domain) {
            *count += 1;
        }
    }

    /// Prints a formatted summary of the controller statistics.
    pub fn print(&self, registry: &DomainRegistry) {
        let requests = if self.state_requests == 0 {
            1
        } else {
            self.state_requests
        };

        println!("\n==========================================================");
        println!("POWER MANAGER STATISTICS");
        println!("==========================================================");
        println!("state.requests           {}", self.state_requests);
        println!(
            "state.scheduled          {} ({:.2}%)",
            self.transitions_scheduled,
            (self.transitions_scheduled as f64 / requests as f64) * 100.0
        );
        println!(
            "state.dropped            {} ({:.2}%)",
            self.transitions_dropped,
            (self.transitions_dropped as f64 / requests as f64) * 100.0
        );
        println!("state.applied            {}", self.transitions_applied);
        println!("state.stale              {}", self.stale_expiries);
        println!("voltage.writes           {}", self.voltage_writes);
        println!("delay.writes             {}", self.delay_writes);
        println!("capture.started          {}", self.captures_started);
        println!("capture.stopped          {}", self.captures_stopped);
        println!("bus.reads                {}", self.reads);
        println!("bus.unmapped             {}", self.unmapped_accesses);
        println!("bus.rejected             {}", self.rejected_accesses);
        println!("----------------------------------------------------------");
        println!("DOMAINS");
        for (id, domain) in registry.iter() {
            let applied = self
                .applied_per_domain
                .get(id.index())
                .copied()
                .unwrap_or(0);
            println!(
                "  {:<10} state: {:<15} applied: {:<6} delays: [{}]",
                domain.name(),
                domain.recorded_state().name(),
                applied,
                domain.delays()
            );
        }
        println!("==========================================================");
    }
}
