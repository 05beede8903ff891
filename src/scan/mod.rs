//! The z-scan driver
//!
//! Sweeps the beam focus depth through the device, rebuilding the whole
//! injection, transport and signal pipeline at every depth. Sweep positions
//! share nothing but the device and the mobility tables: each gets a fresh
//! sampler, fresh populations, a fresh accumulator and an independently seeded
//! random source, so the positions are mutually independent and are evaluated
//! across the rayon pool. Results are collected in sweep order.

use crate::device::Device;
use crate::error::SamplingError;
use crate::injection::{BeamSamplerBuilder, SpeciesSelection};
use crate::mobility::MobilityCurve;
use crate::postprocessor::{collected_charge, weighted_pulse_charge, CollectedCharge};
use crate::signal::Waveform;
use crate::transport::TransientSolverBuilder;
use crate::utilities::linspace;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

/// The outcome of one sweep position, never mutated after construction
#[derive(Debug)]
pub struct SweepPoint {
    pub focus: f64,
    pub waveform: Waveform,
    pub collected: CollectedCharge,
    pub weighted_pulse_charge: f64,
}

/// Builder struct for the scan driver
pub struct ScanDriverBuilder<RefDevice, RefElectronMobility, RefHoleMobility> {
    device: RefDevice,
    electron_mobility: RefElectronMobility,
    hole_mobility: RefHoleMobility,
    wavelength: f64,
    numerical_aperture: f64,
    refractive_index: f64,
    carrier_count: usize,
    selection: SpeciesSelection,
    dt: f64,
    steps: usize,
    probe_time: f64,
    sweep_range: (f64, f64),
    sweep_points: usize,
    base_seed: u64,
}

impl ScanDriverBuilder<(), (), ()> {
    /// Initialise an empty ScanDriverBuilder
    pub fn new() -> Self {
        Self {
            device: (),
            electron_mobility: (),
            hole_mobility: (),
            wavelength: 0.,
            numerical_aperture: 0.,
            refractive_index: 1.,
            carrier_count: 0,
            selection: SpeciesSelection::Both,
            dt: 0.,
            steps: 0,
            probe_time: 0.,
            sweep_range: (0., 0.),
            sweep_points: 0,
            base_seed: 0,
        }
    }
}

impl Default for ScanDriverBuilder<(), (), ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<RefDevice, RefElectronMobility, RefHoleMobility>
    ScanDriverBuilder<RefDevice, RefElectronMobility, RefHoleMobility>
{
    /// Attach the device under bias
    pub fn with_device<D>(
        self,
        device: &D,
    ) -> ScanDriverBuilder<&D, RefElectronMobility, RefHoleMobility> {
        ScanDriverBuilder {
            device,
            electron_mobility: self.electron_mobility,
            hole_mobility: self.hole_mobility,
            wavelength: self.wavelength,
            numerical_aperture: self.numerical_aperture,
            refractive_index: self.refractive_index,
            carrier_count: self.carrier_count,
            selection: self.selection,
            dt: self.dt,
            steps: self.steps,
            probe_time: self.probe_time,
            sweep_range: self.sweep_range,
            sweep_points: self.sweep_points,
            base_seed: self.base_seed,
        }
    }

    /// Attach the electron drift-speed curve
    pub fn with_electron_mobility<M>(
        self,
        electron_mobility: &M,
    ) -> ScanDriverBuilder<RefDevice, &M, RefHoleMobility> {
        ScanDriverBuilder {
            device: self.device,
            electron_mobility,
            hole_mobility: self.hole_mobility,
            wavelength: self.wavelength,
            numerical_aperture: self.numerical_aperture,
            refractive_index: self.refractive_index,
            carrier_count: self.carrier_count,
            selection: self.selection,
            dt: self.dt,
            steps: self.steps,
            probe_time: self.probe_time,
            sweep_range: self.sweep_range,
            sweep_points: self.sweep_points,
            base_seed: self.base_seed,
        }
    }

    /// Attach the hole drift-speed curve
    pub fn with_hole_mobility<M>(
        self,
        hole_mobility: &M,
    ) -> ScanDriverBuilder<RefDevice, RefElectronMobility, &M> {
        ScanDriverBuilder {
            device: self.device,
            electron_mobility: self.electron_mobility,
            hole_mobility,
            wavelength: self.wavelength,
            numerical_aperture: self.numerical_aperture,
            refractive_index: self.refractive_index,
            carrier_count: self.carrier_count,
            selection: self.selection,
            dt: self.dt,
            steps: self.steps,
            probe_time: self.probe_time,
            sweep_range: self.sweep_range,
            sweep_points: self.sweep_points,
            base_seed: self.base_seed,
        }
    }

    /// Attach the excitation optics
    pub fn with_optics(
        self,
        wavelength: f64,
        numerical_aperture: f64,
        refractive_index: f64,
    ) -> Self {
        Self {
            wavelength,
            numerical_aperture,
            refractive_index,
            ..self
        }
    }

    /// Attach the number of carriers injected at each sweep position
    pub fn with_carrier_count(self, carrier_count: usize) -> Self {
        Self {
            carrier_count,
            ..self
        }
    }

    /// Attach the simulated species selection
    pub fn with_species(self, selection: SpeciesSelection) -> Self {
        Self { selection, ..self }
    }

    /// Attach the integration time step and step count
    pub fn with_time_stepping(self, dt: f64, steps: usize) -> Self {
        Self { dt, steps, ..self }
    }

    /// Attach the probe time for the weighted pulse charge
    pub fn with_probe_time(self, probe_time: f64) -> Self {
        Self { probe_time, ..self }
    }

    /// Attach the swept focus range and the number of sweep positions
    pub fn with_sweep(self, sweep_range: (f64, f64), sweep_points: usize) -> Self {
        Self {
            sweep_range,
            sweep_points,
            ..self
        }
    }

    /// Attach the base seed from which per-position seeds are derived
    pub fn with_base_seed(self, base_seed: u64) -> Self {
        Self { base_seed, ..self }
    }
}

impl<'a> ScanDriverBuilder<&'a Device<f64>, &'a MobilityCurve<f64>, &'a MobilityCurve<f64>> {
    pub fn build(self) -> ScanDriver<'a> {
        ScanDriver {
            device: self.device,
            electron_mobility: self.electron_mobility,
            hole_mobility: self.hole_mobility,
            wavelength: self.wavelength,
            numerical_aperture: self.numerical_aperture,
            refractive_index: self.refractive_index,
            carrier_count: self.carrier_count,
            selection: self.selection,
            dt: self.dt,
            steps: self.steps,
            probe_time: self.probe_time,
            sweep_range: self.sweep_range,
            sweep_points: self.sweep_points,
            base_seed: self.base_seed,
        }
    }
}

/// A structure holding the information to carry out a focus-depth sweep
pub struct ScanDriver<'a> {
    device: &'a Device<f64>,
    electron_mobility: &'a MobilityCurve<f64>,
    hole_mobility: &'a MobilityCurve<f64>,
    wavelength: f64,
    numerical_aperture: f64,
    refractive_index: f64,
    carrier_count: usize,
    selection: SpeciesSelection,
    dt: f64,
    steps: usize,
    probe_time: f64,
    sweep_range: (f64, f64),
    sweep_points: usize,
    base_seed: u64,
}

impl ScanDriver<'_> {
    /// Runs the full pipeline at every sweep position.
    ///
    /// Positions are independent and evaluated in parallel, each with its own
    /// random source seeded from the base seed and the position index.
    pub fn run(&self) -> Result<Vec<SweepPoint>, SamplingError> {
        let focuses = linspace(self.sweep_range.0, self.sweep_range.1, self.sweep_points);
        focuses
            .par_iter()
            .enumerate()
            .map(|(index, &focus)| {
                let mut rng = StdRng::seed_from_u64(self.base_seed.wrapping_add(index as u64));
                let point = self.run_at(focus, &mut rng)?;
                tracing::info!(
                    "sweep position {index}: focus {focus:.3e} m, collected {:.3e} C",
                    point.collected.total
                );
                Ok(point)
            })
            .collect()
    }

    fn run_at(&self, focus: f64, rng: &mut StdRng) -> Result<SweepPoint, SamplingError> {
        let sampler = BeamSamplerBuilder::new()
            .with_focus(focus)
            .with_wavelength(self.wavelength)
            .with_numerical_aperture(self.numerical_aperture)
            .with_refractive_index(self.refractive_index)
            .with_support((0., self.device.physical_width()))
            .with_sample_count(self.carrier_count)
            .build();
        let cloud = sampler.sample(rng)?;

        let solver = TransientSolverBuilder::new()
            .with_device(self.device)
            .with_electron_mobility(self.electron_mobility)
            .with_hole_mobility(self.hole_mobility)
            .with_time_step(self.dt)
            .with_step_count(self.steps)
            .build();
        let record = solver.run(&cloud, self.selection, rng);

        let collected = collected_charge(&record.waveform);
        let weighted = weighted_pulse_charge(&record.waveform, self.probe_time);
        Ok(SweepPoint {
            focus,
            waveform: record.waveform,
            collected,
            weighted_pulse_charge: weighted,
        })
    }
}
