//! Configuration errors.
//!
//! Bus traffic never fails: malformed or unmapped accesses are logged and
//! complete as no-ops. The only fallible step is building a system from a
//! configuration, which is reported through [`ConfigError`].

use thiserror::Error;

/// Errors raised while parsing or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML text could not be deserialized.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("cannot read configuration file '{path}': {source}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No power domains were configured.
    #[error("at least one power domain must be configured")]
    NoDomains,

    /// Two domains share the same name.
    #[error("duplicate power domain '{0}'")]
    DuplicateDomain(String),

    /// More domains than a register group window can address.
    #[error("{count} domains do not fit in the {group} window ({capacity} slots)")]
    TooManyDomains {
        /// Register group whose window overflowed.
        group: &'static str,
        /// Number of configured domains.
        count: usize,
        /// Number of slots the window provides.
        capacity: u64,
    },

    /// Two register group windows overlap inside the PMU window.
    #[error("register groups {0} and {1} overlap")]
    OverlappingGroups(&'static str, &'static str),

    /// A sensor refers to a domain that does not exist.
    #[error("sensor '{sensor}' refers to unknown domain '{domain}'")]
    UnknownDomain {
        /// Sensor name.
        sensor: String,
        /// Domain name it refers to.
        domain: String,
    },

    /// Two bus devices claim overlapping address ranges.
    #[error("devices '{0}' and '{1}' overlap on the bus")]
    OverlappingDevices(String, String),

    /// The number of actuator port pairs does not match the domain list.
    #[error("expected actuator ports for {expected} domains, got {found}")]
    PortCount {
        /// Number of configured domains.
        expected: usize,
        /// Number of port pairs supplied.
        found: usize,
    },

    /// A power curve lists voltages out of order.
    #[error("power curve for '{0}' must list points in increasing voltage order")]
    InvalidCurve(String),

    /// A window extends past the end of the address space.
    #[error("address window of '{0}' overflows the address space")]
    AddressOverflow(String),

    /// The tick period is not a positive number of seconds.
    #[error("tick period must be a positive number of seconds, got {0}")]
    InvalidTick(f64),
}

/// Errors raised while loading a workload.
#[derive(Debug, Error)]
pub enum WorkloadError {
    /// The TOML text could not be deserialized.
    #[error("invalid workload: {0}")]
    Parse(#[from] toml::de::Error),

    /// The workload file could not be read.
    #[error("cannot read workload file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A step uses an access width other than 1, 2, 4 or 8 bytes.
    #[error("step {step}: unsupported access width {width}")]
    InvalidWidth { step: usize, width: u64 },

    /// A write step carries no value.
    #[error("step {step}: write without a value")]
    MissingValue { step: usize },

    /// A floating-point value cannot be encoded at the step's width.
    #[error("step {step}: a floating-point value needs a 4 or 8 byte access")]
    NarrowFloat { step: usize },
}
