/// This module governs the high-level implementation of the simulation
mod calculations;
mod configuration;
mod error;
mod telemetry;

pub(crate) use configuration::Configuration;
use configuration::SimulationMode;

use crate::device::{Device, Material};
use crate::mobility::MobilityCurve;
use clap::{ArgEnum, Parser};
use color_eyre::eyre::eyre;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct App {
    /// Path to the TOML configuration describing the device, injection and run
    file_path: Option<PathBuf>,
    #[clap(arg_enum, short, long, default_value = "info")]
    log_level: LogLevel,
    /// Overrides the mode given in the configuration file
    #[clap(arg_enum, short, long)]
    mode: Option<SimulationMode>,
    /// Directory results and logs are written into
    #[clap(short, long, default_value = "results")]
    output: PathBuf,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ArgEnum)]
enum LogLevel {
    Trace,
    Info,
    Debug,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

pub fn run() -> color_eyre::Result<()> {
    let cli = App::parse();

    std::fs::create_dir_all(&cli.output)?;
    let (subscriber, _guard) = telemetry::get_subscriber(cli.log_level, &cli.output);
    telemetry::init_subscriber(subscriber);

    let path = cli
        .file_path
        .ok_or(eyre!("A configuration path needs to be passed."))?;
    let config = Configuration::build(&path)?;

    let material = Material::from_str(&config.device.material)?;
    let device: Device<f64> = Device::new(
        config.device.doping_concentration,
        config.device.width,
        config.device.length,
        config.device.built_in_voltage,
        config.device.bias_voltage,
        config.device.resistance,
        material,
    );
    tracing::info!(
        "built {} device: depleted width {:.3e} m, depletion voltage {:.1} V",
        device.material(),
        device.depleted_width(),
        device.depletion_voltage()
    );

    let electron_mobility: MobilityCurve<f64> =
        MobilityCurve::from_path(&config.mobility.electron_table)?;
    let hole_mobility: MobilityCurve<f64> =
        MobilityCurve::from_path(&config.mobility.hole_table)?;

    let mode = cli.mode.unwrap_or(config.simulation.mode);
    match mode {
        SimulationMode::Visualization => calculations::transient_calculation(
            &config,
            &device,
            &electron_mobility,
            &hole_mobility,
            &cli.output,
        )?,
        SimulationMode::ZScan => calculations::z_scan_calculation(
            &config,
            &device,
            &electron_mobility,
            &hole_mobility,
            &cli.output,
        )?,
    }

    Ok(())
}
