use serde::Deserialize;
use std::fs;

use crate::common::ConfigError;

const PMU_BASE: u64 = 0x2000_4000;
const STATE_OFFSET: u64 = 0x0000;
const VOLTAGE_OFFSET: u64 = 0x1000;
const CAPTURE_OFFSET: u64 = 0x2000;
const DELAY_OFFSET: u64 = 0x3000;
const GROUP_SIZE: u64 = 0x1000;
const CAPTURE_SIZE: u64 = 0x10;
const REG_STRIDE: u64 = 4;
const DELAY_STRIDE: u64 = 16;

const SENSOR_BASE: u64 = 0x2000_0000;
const SENSOR_SPACING: u64 = 0x100;

const DEFAULT_DELAY: u64 = 1;
const DEFAULT_VOLTAGE: f64 = 1.2;
const DEFAULT_SEED: u64 = 0x5EED;
const DEFAULT_TICK_SECONDS: f64 = 1e-12;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub pmu: PmuConfig,

    #[serde(default = "default_domains")]
    pub domains: Vec<DomainConfig>,

    #[serde(default = "default_sensors")]
    pub sensors: Vec<SensorConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            pmu: PmuConfig::default(),
            domains: default_domains(),
            sensors: default_sensors(),
        }
    }
}

impl Config {
    /// Parses and validates a TOML configuration.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks the cross-field constraints serde cannot express.
    ///
    /// The domain list must be non-empty with unique names and fit in every
    /// per-domain register window, the register group windows must not
    /// overlap, every sensor must name an existing domain, and no two bus
    /// devices may share addresses.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domains.is_empty() {
            return Err(ConfigError::NoDomains);
        }
        if !(self.general.tick_seconds.is_finite() && self.general.tick_seconds > 0.0) {
            return Err(ConfigError::InvalidTick(self.general.tick_seconds));
        }
        for (i, domain) in self.domains.iter().enumerate() {
            if self.domains[..i].iter().any(|d| d.name == domain.name) {
                return Err(ConfigError::DuplicateDomain(domain.name.clone()));
            }
            if let Some(profile) = &domain.power {
                profile.validate(&domain.name)?;
            }
        }

        let count = self.domains.len();
        for (group, stride) in [
            ("state-control", self.pmu.state_stride),
            ("voltage-control", self.pmu.voltage_stride),
            ("delay-config", self.pmu.delay_stride),
        ] {
            let capacity = if stride == 0 {
                0
            } else {
                self.pmu.group_size / stride
            };
            if (count as u64) > capacity {
                return Err(ConfigError::TooManyDomains {
                    group,
                    count,
                    capacity,
                });
            }
        }

        let windows = self.pmu.group_windows();
        for &(name, offset, size) in &windows {
            end_of(name, offset, size)?;
        }
        for (i, &(name_a, base_a, size_a)) in windows.iter().enumerate() {
            for &(name_b, base_b, size_b) in &windows[i + 1..] {
                if base_a < base_b + size_b && base_b < base_a + size_a {
                    return Err(ConfigError::OverlappingGroups(name_a, name_b));
                }
            }
        }

        for sensor in &self.sensors {
            if !self.domains.iter().any(|d| d.name == sensor.domain) {
                return Err(ConfigError::UnknownDomain {
                    sensor: sensor.name.clone(),
                    domain: sensor.domain.clone(),
                });
            }
        }

        let mut devices = vec![("pmu".to_string(), self.pmu.base, self.pmu.window_size())];
        devices.extend(
            self.sensors
                .iter()
                .map(|s| (s.name.clone(), s.base, s.size)),
        );
        for (name, base, size) in &devices {
            end_of(name, *base, *size)?;
        }
        for (i, (name_a, base_a, size_a)) in devices.iter().enumerate() {
            for (name_b, base_b, size_b) in &devices[i + 1..] {
                if *base_a < base_b + size_b && *base_b < base_a + size_a {
                    return Err(ConfigError::OverlappingDevices(
                        name_a.clone(),
                        name_b.clone(),
                    ));
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    /// Seed for every pseudo-random source in the system.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Duration of one simulation tick, in seconds.
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: f64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            tick_seconds: default_tick_seconds(),
        }
    }
}

/// Placement of the PMU on the bus and of its register groups.
///
/// Offsets are relative to `base`. Each per-domain group is `group_size`
/// bytes long; domain `i` owns the slot at `offset + i * stride`.
#[derive(Debug, Deserialize, Clone)]
pub struct PmuConfig {
    #[serde(default = "default_pmu_base")]
    pub base: u64,

    #[serde(default = "default_state_offset")]
    pub state_offset: u64,

    #[serde(default = "default_voltage_offset")]
    pub voltage_offset: u64,

    #[serde(default = "default_capture_offset")]
    pub capture_offset: u64,

    #[serde(default = "default_delay_offset")]
    pub delay_offset: u64,

    #[serde(default = "default_group_size")]
    pub group_size: u64,

    #[serde(default = "default_capture_size")]
    pub capture_size: u64,

    #[serde(default = "default_reg_stride")]
    pub state_stride: u64,

    #[serde(default = "default_reg_stride")]
    pub voltage_stride: u64,

    #[serde(default = "default_delay_stride")]
    pub delay_stride: u64,
}

impl Default for PmuConfig {
    fn default() -> Self {
        Self {
            base: PMU_BASE,
            state_offset: STATE_OFFSET,
            voltage_offset: VOLTAGE_OFFSET,
            capture_offset: CAPTURE_OFFSET,
            delay_offset: DELAY_OFFSET,
            group_size: GROUP_SIZE,
            capture_size: CAPTURE_SIZE,
            state_stride: REG_STRIDE,
            voltage_stride: REG_STRIDE,
            delay_stride: DELAY_STRIDE,
        }
    }
}

impl PmuConfig {
    /// Returns `(name, offset, size)` for every register group window.
    pub fn group_windows(&self) -> [(&'static str, u64, u64); 4] {
        [
            ("state-control", self.state_offset, self.group_size),
            ("voltage-control", self.voltage_offset, self.group_size),
            ("capture-control", self.capture_offset, self.capture_size),
            ("delay-config", self.delay_offset, self.group_size),
        ]
    }

    /// Size of the bus window covering every register group.
    pub fn window_size(&self) -> u64 {
        self.group_windows()
            .iter()
            .map(|(_, offset, size)| offset.saturating_add(*size))
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DomainConfig {
    pub name: String,

    /// Default delays indexed by transition kind:
    /// on→off, off→on, on→clock-gated, clock-gated→on.
    #[serde(default = "default_delays")]
    pub delays: [u64; 4],

    /// Supply voltage in volts at reset.
    #[serde(default = "default_voltage")]
    pub initial_voltage: f64,

    /// Power drawn by the blocks in this domain. Domains without a profile
    /// contribute nothing to energy accounting.
    #[serde(default)]
    pub power: Option<PowerProfileConfig>,
}

impl DomainConfig {
    /// Creates a domain with default delays and no power profile.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            delays: default_delays(),
            initial_voltage: default_voltage(),
            power: None,
        }
    }
}

/// Voltage-dependent power characteristics of a domain.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PowerProfileConfig {
    /// Leakage power in watts, drawn whenever the domain is not OFF.
    pub leakage: PowerCurve,
    /// Background dynamic power in watts, drawn while the domain is ON.
    pub dynamic: PowerCurve,
    /// Energy in picojoules charged for every access to a device in the domain.
    #[serde(default)]
    pub access: PowerCurve,
}

impl PowerProfileConfig {
    fn validate(&self, domain: &str) -> Result<(), ConfigError> {
        for curve in [&self.leakage, &self.dynamic, &self.access] {
            if !curve.is_valid() {
                return Err(ConfigError::InvalidCurve(domain.to_string()));
            }
        }
        Ok(())
    }
}

/// Piecewise-linear curve over supply voltage.
///
/// Each point is `[millivolts, value]`. Values outside the first and last
/// point are clamped to the end points.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct PowerCurve {
    #[serde(default)]
    pub points: Vec<[f64; 2]>,
}

impl PowerCurve {
    /// Creates a curve through two `(millivolts, value)` points.
    pub fn linear(low: (f64, f64), high: (f64, f64)) -> Self {
        Self {
            points: vec![[low.0, low.1], [high.0, high.1]],
        }
    }

    /// Evaluates the curve at a supply voltage given in volts.
    ///
    /// An empty curve evaluates to zero.
    pub fn at_volts(&self, volts: f64) -> f64 {
        let mv = volts * 1000.0;
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if mv <= first[0] {
            return first[1];
        }
        if mv >= last[0] {
            return last[1];
        }
        for pair in self.points.windows(2) {
            let [x0, y0] = pair[0];
            let [x1, y1] = pair[1];
            if mv <= x1 {
                return y0 + (y1 - y0) * (mv - x0) / (x1 - x0);
            }
        }
        last[1]
    }

    fn is_valid(&self) -> bool {
        self.points.windows(2).all(|p| p[0][0] < p[1][0])
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SensorConfig {
    pub name: String,

    pub base: u64,

    #[serde(default = "default_sensor_size")]
    pub size: u64,

    /// Power domain the sensor is supplied from.
    pub domain: String,
}

/// End address of a window, rejecting ranges past the top of the address space.
fn end_of(name: &str, base: u64, size: u64) -> Result<u64, ConfigError> {
    base.checked_add(size)
        .ok_or_else(|| ConfigError::AddressOverflow(name.to_string()))
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_tick_seconds() -> f64 {
    DEFAULT_TICK_SECONDS
}

fn default_pmu_base() -> u64 {
    PMU_BASE
}

fn default_state_offset() -> u64 {
    STATE_OFFSET
}

fn default_voltage_offset() -> u64 {
    VOLTAGE_OFFSET
}

fn default_capture_offset() -> u64 {
    CAPTURE_OFFSET
}

fn default_delay_offset() -> u64 {
    DELAY_OFFSET
}

fn default_group_size() -> u64 {
    GROUP_SIZE
}

fn default_capture_size() -> u64 {
    CAPTURE_SIZE
}

fn default_reg_stride() -> u64 {
    REG_STRIDE
}

fn default_delay_stride() -> u64 {
    DELAY_STRIDE
}

fn default_delays() -> [u64; 4] {
    [DEFAULT_DELAY; 4]
}

fn default_voltage() -> f64 {
    DEFAULT_VOLTAGE
}

fn default_sensor_size() -> u64 {
    SENSOR_SPACING
}

/// Power profile of the generic sensor block: 600 mV and 1200 mV points.
pub fn sensor_power_profile() -> PowerProfileConfig {
    PowerProfileConfig {
        leakage: PowerCurve::linear((600.0, 0.000_05), (1200.0, 0.000_10)),
        dynamic: PowerCurve::linear((600.0, 0.000_20), (1200.0, 0.000_50)),
        access: PowerCurve::linear((600.0, 5.0), (1200.0, 10.0)),
    }
}

fn default_domains() -> Vec<DomainConfig> {
    let mut domains = vec![DomainConfig::new("host")];
    for name in ["sensor1", "sensor2", "sensor3"] {
        domains.push(DomainConfig {
            power: Some(sensor_power_profile()),
            ..DomainConfig::new(name)
        });
    }
    domains
}

fn default_sensors() -> Vec<SensorConfig> {
    (0..3u64)
        .map(|i| SensorConfig {
            name: format!("sensor{}", i + 1),
            base: SENSOR_BASE + i * SENSOR_SPACING,
            size: SENSOR_SPACING,
            domain: format!("sensor{}", i + 1),
        })
        .collect()
}
