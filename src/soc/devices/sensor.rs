//! Sensor peripheral.

use log::debug;
use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::common::AccessWidth;
use crate::pmu::Scheduler;
use crate::soc::rail::PowerRail;
use crate::soc::traits::Device;

/// Offset of the sample register.
const SAMPLE_OFFSET: u64 = 0;

/// Minimal sensor model.
///
/// A single read-only 32-bit sample register at offset 0 returns a
/// pseudo-random value. Every access is charged to the sensor's power rail,
/// whether or not it hits the sample register.
pub struct Sensor {
    name: String,
    base_addr: u64,
    size: u64,
    rail: PowerRail,
    rng: ChaCha8Rng,
    last_sample: u32,
    samples: u64,
}

impl Sensor {
    /// Creates a sensor.
    ///
    /// # Arguments
    ///
    /// * `name` - Device name
    /// * `base_addr` - Bus base address
    /// * `size` - Size of the bus window
    /// * `rail` - Supply of the domain the sensor belongs to
    /// * `seed` - Seed of the sample generator
    pub fn new(name: &str, base_addr: u64, size: u64, rail: PowerRail, seed: u64) -> Self {
        Self {
            name: name.to_string(),
            base_addr,
            size,
            rail,
            rng: ChaCha8Rng::seed_from_u64(seed),
            last_sample: 0,
            samples: 0,
        }
    }

    /// Value returned by the most recent sample read.
    pub fn last_sample(&self) -> u32 {
        self.last_sample
    }

    /// Number of sample reads served.
    pub fn samples(&self) -> u64 {
        self.samples
    }
}

impl Device for Sensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn address_range(&self) -> (u64, u64) {
        (self.base_addr, self.size)
    }

    fn read(&mut self, offset: u64, width: AccessWidth, _sched: &mut dyn Scheduler) -> u64 {
        self.rail.charge_access();
        if offset != SAMPLE_OFFSET || width != AccessWidth::Word {
            return 0;
        }
        self.last_sample = self.rng.next_u32();
        self.samples += 1;
        debug!("{}: sample {:#010x}", self.name, self.last_sample);
        u64::from(self.last_sample)
    }

    fn write(&mut self, offset: u64, _width: AccessWidth, _data: u64, _sched: &mut dyn Scheduler) {
        self.rail.charge_access();
        debug!("{}: write to read-only offset {offset:#x} ignored", self.name);
    }
}
