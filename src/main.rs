//! SoC Power Management Unit Simulator CLI.
//!
//! Builds a system from a TOML configuration, replays a workload of timed
//! bus accesses against it, lets every pending power transition complete,
//! and reports the reads, the energy measurements and the controller
//! statistics.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use soc_pmu::config::Config;
use soc_pmu::sim::Workload;
use soc_pmu::soc::System;

/// Command-line arguments for the PMU simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "SoC Power Management Unit Simulator")]
struct Args {
    #[arg(short, long, default_value = "configs/default.toml")]
    config: String,

    #[arg(short, long)]
    workload: String,

    /// Print measurements as JSON lines.
    #[arg(long)]
    json: bool,
}

/// Main entry point for the PMU simulator.
///
/// # Behavior
///
/// 1. **Configuration**: Parses command-line arguments, loads the TOML
///    configuration and the workload.
/// 2. **Initialization**: Constructs the `System` (bus, PMU, rails, sensors).
/// 3. **Replay**: Issues every workload access at its tick, printing reads.
/// 4. **Drain**: Delivers the remaining transition timers.
/// 5. **Teardown**: Prints measurements and controller statistics.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config::load(&args.config)
        .with_context(|| format!("failed to load configuration '{}'", args.config))?;
    let workload = Workload::load(&args.workload)
        .with_context(|| format!("failed to load workload '{}'", args.workload))?;

    let mut system = System::new(&config).context("failed to build system")?;

    println!("Global Configuration");
    println!("--------------------");
    println!("General:");
    println!("  Seed:               {:#x}", config.general.seed);
    println!("  Tick:               {:e} s", config.general.tick_seconds);
    println!("PMU:");
    println!("  Base:               {:#x}", config.pmu.base);
    println!("  Window:             {:#x} bytes", config.pmu.window_size());
    println!("Domains:");
    for domain in &config.domains {
        println!(
            "  {:<10}          {:.3} V, delays {:?}",
            domain.name, domain.initial_voltage, domain.delays
        );
    }
    println!("Sensors:");
    for sensor in &config.sensors {
        println!(
            "  {:<10}          {:#x} ({})",
            sensor.name, sensor.base, sensor.domain
        );
    }
    println!("--------------------");

    info!("replaying {} bus accesses", workload.len());
    for access in workload.accesses() {
        if let Some(value) = system.execute(access) {
            println!(
                "[{:>12}] read  {:#010x} ({} bytes) = {:#x}",
                system.now(),
                access.addr,
                access.width.bytes(),
                value
            );
        }
    }

    let end = system.run_until_idle();
    info!("simulation idle at tick {end}");

    let pmu = system
        .pmu_mut()
        .context("system has no power manager on the bus")?;
    let records = pmu.take_measurements();
    if args.json {
        for record in &records {
            println!("{}", serde_json::to_string(record)?);
        }
    } else {
        for record in &records {
            let since = match record.started_at {
                Some(t) => format!("since {t}"),
                None => "without start".to_string(),
            };
            println!(
                "measurement @ {}: {:.9} W (dynamic {:.9} W, static {:.9} W) {}",
                record.timestamp,
                record.average_power,
                record.dynamic_power,
                record.static_power,
                since
            );
        }
    }

    pmu.stats().print(pmu.registry());
    Ok(())
}
