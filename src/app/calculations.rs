//! # Calculations
//!
//! Delegated functions from `App` to run the visualization and z-scan modes and
//! serialise their results for the external renderer
//!

use super::configuration::Configuration;
use super::error::TctError;
use crate::device::Device;
use crate::error::ConfigurationError;
use crate::injection::BeamSamplerBuilder;
use crate::mobility::MobilityCurve;
use crate::postprocessor::collected_charge;
use crate::scan::{ScanDriverBuilder, SweepPoint};
use crate::signal::Waveform;
use crate::transport::{PositionFrame, TransientSolverBuilder};
use itertools::izip;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Runs a single transient at the configured focus and writes the waveform and
/// the per-step carrier positions for the external renderer
pub(crate) fn transient_calculation(
    config: &Configuration,
    device: &Device<f64>,
    electron_mobility: &MobilityCurve<f64>,
    hole_mobility: &MobilityCurve<f64>,
    output: &Path,
) -> Result<(), TctError> {
    tracing::info!("Transient calculation");
    let mut rng = build_rng(config.simulation.seed);

    let sampler = BeamSamplerBuilder::new()
        .with_focus(config.injection.focus)
        .with_wavelength(config.injection.wavelength)
        .with_numerical_aperture(config.injection.numerical_aperture)
        .with_refractive_index(config.injection.refractive_index)
        .with_support((0., device.physical_width()))
        .with_sample_count(config.injection.carrier_count)
        .build();
    let cloud = sampler.sample(&mut rng)?;

    let solver = TransientSolverBuilder::new()
        .with_device(device)
        .with_electron_mobility(electron_mobility)
        .with_hole_mobility(hole_mobility)
        .with_time_step(config.simulation.dt)
        .with_step_count(config.simulation.steps)
        .with_position_trace(true)
        .build();
    let record = solver.run(&cloud, config.injection.species, &mut rng);

    let collected = collected_charge(&record.waveform);
    tracing::info!(
        "collected charge: {:.3e} C electron, {:.3e} C hole",
        collected.electron,
        collected.hole
    );

    write_waveform(&output.join("waveform.csv"), &record.waveform)?;
    write_position_frames(&output.join("positions.csv"), &record.frames)?;
    Ok(())
}

/// Sweeps the focus depth and writes the summary curves for the external renderer
pub(crate) fn z_scan_calculation(
    config: &Configuration,
    device: &Device<f64>,
    electron_mobility: &MobilityCurve<f64>,
    hole_mobility: &MobilityCurve<f64>,
    output: &Path,
) -> Result<(), TctError> {
    let scan = config.scan.as_ref().ok_or_else(|| {
        ConfigurationError::Invalid("z_scan mode requires a [scan] section".into())
    })?;
    tracing::info!("z-scan calculation over {} positions", scan.points);

    let driver = ScanDriverBuilder::new()
        .with_device(device)
        .with_electron_mobility(electron_mobility)
        .with_hole_mobility(hole_mobility)
        .with_optics(
            config.injection.wavelength,
            config.injection.numerical_aperture,
            config.injection.refractive_index,
        )
        .with_carrier_count(config.injection.carrier_count)
        .with_species(config.injection.species)
        .with_time_stepping(config.simulation.dt, config.simulation.steps)
        .with_probe_time(config.simulation.probe_time)
        .with_sweep((scan.start, scan.stop), scan.points)
        .with_base_seed(config.simulation.seed.unwrap_or_else(rand::random))
        .build();
    let points = driver.run()?;

    write_scan_summary(&output.join("z_scan.csv"), &points)?;
    Ok(())
}

fn build_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn write_waveform(path: &Path, waveform: &Waveform) -> Result<(), TctError> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "time,electron_current,hole_current,total_current")?;
    for (time, electron, hole, total) in izip!(
        waveform.times(),
        waveform.electron_current(),
        waveform.hole_current(),
        waveform.total_current()
    ) {
        writeln!(writer, "{time:e},{electron:e},{hole:e},{total:e}")?;
    }
    Ok(())
}

fn write_position_frames(path: &Path, frames: &[PositionFrame]) -> Result<(), TctError> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "time,species,x,y")?;
    for frame in frames {
        for position in &frame.electrons {
            writeln!(writer, "{:e},electron,{:e},{:e}", frame.time, position.x, position.y)?;
        }
        for position in &frame.holes {
            writeln!(writer, "{:e},hole,{:e},{:e}", frame.time, position.x, position.y)?;
        }
    }
    Ok(())
}

fn write_scan_summary(path: &Path, points: &[SweepPoint]) -> Result<(), TctError> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(
        writer,
        "focus,electron_charge,hole_charge,total_charge,weighted_pulse_charge"
    )?;
    for point in points {
        writeln!(
            writer,
            "{:e},{:e},{:e},{:e},{:e}",
            point.focus,
            point.collected.electron,
            point.collected.hole,
            point.collected.total,
            point.weighted_pulse_charge
        )?;
    }
    Ok(())
}
