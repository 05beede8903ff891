//! Drift-diffusion transport engine
//!
//! Advances the carrier populations through fixed time steps. Each step treats
//! every carrier independently:
//!
//! - a carrier whose depth lies outside `[0, x_lim]`, where `x_lim` is the
//!   collection depth, is inert: its velocity is zeroed and no field lookup is
//!   performed. Inert carriers are never removed, they simply stop contributing
//!   to the induced signal for the remainder of the run;
//! - an active carrier drifts along the depth axis with the tabulated speed at
//!   the local field, electrons and holes integrating in opposite directions;
//! - a Gaussian diffusive kick of standard deviation `sqrt(2 D dt)` is applied
//!   on both axes, but only while the carrier remains inside the active
//!   rectangle after its drift displacement.
//!
//! Within a step the carriers are mutually independent, so the per-carrier
//! update fans out across the rayon pool. The diffusive kicks are pre-drawn
//! sequentially from the run's random source before the parallel pass: a fixed
//! seed therefore reproduces the run bit for bit whatever the thread schedule,
//! and the join of the parallel pass is the barrier after which the signal
//! accumulator may read velocities.
//!
//! A full run is orchestrated by `TransientSolver`, constructed as
//!
//! ```ignore
//! let solver = TransientSolverBuilder::new()
//!     .with_device(&device)
//!     .with_electron_mobility(&electron_curve)
//!     .with_hole_mobility(&hole_curve)
//!     .with_time_step(1e-12)
//!     .with_step_count(2000)
//!     .build();
//! let record = solver.run(&cloud, SpeciesSelection::Both, &mut rng);
//! ```

use crate::constants::{CM_PER_S_TO_M_PER_S, V_PER_M_TO_MV_PER_CM};
use crate::device::Device;
use crate::fields::linear_field;
use crate::injection::{CarrierPopulation, SampledCloud, Species, SpeciesSelection};
use crate::mobility::MobilityCurve;
use crate::signal::{SignalAccumulator, Waveform};
use nalgebra::Vector2;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;

/// Advances one population by single time steps
pub struct DriftDiffusionIntegrator<'a> {
    device: &'a Device<f64>,
    dt: f64,
}

impl<'a> DriftDiffusionIntegrator<'a> {
    pub fn new(device: &'a Device<f64>, dt: f64) -> Self {
        Self { device, dt }
    }

    /// Carries the population through one time step of drift and diffusion
    pub fn advance(
        &self,
        population: &mut CarrierPopulation,
        mobility: &MobilityCurve<f64>,
        rng: &mut (impl Rng + ?Sized),
    ) {
        let x_lim = self.device.collection_depth();
        let half_length = self.device.physical_length() / 2.;
        let sign = population.species().drift_sign();
        let sigma = (2. * population.species().diffusion_constant(self.device) * self.dt).sqrt();
        // sigma is finite and non-negative for any physical device
        let kick = Normal::new(0., sigma).unwrap();
        let kicks: Vec<Vector2<f64>> = (0..population.len())
            .map(|_| Vector2::new(kick.sample(rng), kick.sample(rng)))
            .collect();

        let device = self.device;
        let dt = self.dt;
        population
            .carriers
            .par_iter_mut()
            .zip(kicks.par_iter())
            .for_each(|(carrier, kick)| {
                let position = carrier.position();
                if position.y < 0. || position.y > x_lim {
                    carrier.set_velocity(0., 0.);
                    return;
                }
                let field = linear_field(position.x, position.y, device) * V_PER_M_TO_MV_PER_CM;
                let speed = mobility.speed(field) * CM_PER_S_TO_M_PER_S;
                carrier.set_velocity(0., sign * speed);
                carrier.translate(0., sign * speed * dt);

                // Diffusion only acts while the carrier is still inside the
                // active rectangle after its drift displacement
                let moved = carrier.position();
                if moved.y >= 0.
                    && moved.y <= x_lim
                    && moved.x >= -half_length
                    && moved.x <= half_length
                {
                    carrier.translate(kick.x, kick.y);
                }
            });
    }
}

/// A snapshot of every carrier position at one instant, for external rendering
#[derive(Clone, Debug)]
pub struct PositionFrame {
    pub time: f64,
    pub electrons: Vec<Vector2<f64>>,
    pub holes: Vec<Vector2<f64>>,
}

/// The output of one transient run
#[derive(Debug)]
pub struct TransientRecord {
    pub waveform: Waveform,
    /// Per-step position snapshots, empty unless tracing was requested
    pub frames: Vec<PositionFrame>,
}

/// Builder struct for the transient solver
pub struct TransientSolverBuilder<RefDevice, RefElectronMobility, RefHoleMobility> {
    device: RefDevice,
    electron_mobility: RefElectronMobility,
    hole_mobility: RefHoleMobility,
    dt: f64,
    steps: usize,
    trace_positions: bool,
}

impl TransientSolverBuilder<(), (), ()> {
    /// Initialise an empty TransientSolverBuilder
    pub fn new() -> Self {
        Self {
            device: (),
            electron_mobility: (),
            hole_mobility: (),
            dt: 0.,
            steps: 0,
            trace_positions: false,
        }
    }
}

impl Default for TransientSolverBuilder<(), (), ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<RefDevice, RefElectronMobility, RefHoleMobility>
    TransientSolverBuilder<RefDevice, RefElectronMobility, RefHoleMobility>
{
    /// Attach the device under bias
    pub fn with_device<D>(
        self,
        device: &D,
    ) -> TransientSolverBuilder<&D, RefElectronMobility, RefHoleMobility> {
        TransientSolverBuilder {
            device,
            electron_mobility: self.electron_mobility,
            hole_mobility: self.hole_mobility,
            dt: self.dt,
            steps: self.steps,
            trace_positions: self.trace_positions,
        }
    }

    /// Attach the electron drift-speed curve
    pub fn with_electron_mobility<M>(
        self,
        electron_mobility: &M,
    ) -> TransientSolverBuilder<RefDevice, &M, RefHoleMobility> {
        TransientSolverBuilder {
            device: self.device,
            electron_mobility,
            hole_mobility: self.hole_mobility,
            dt: self.dt,
            steps: self.steps,
            trace_positions: self.trace_positions,
        }
    }

    /// Attach the hole drift-speed curve
    pub fn with_hole_mobility<M>(
        self,
        hole_mobility: &M,
    ) -> TransientSolverBuilder<RefDevice, RefElectronMobility, &M> {
        TransientSolverBuilder {
            device: self.device,
            electron_mobility: self.electron_mobility,
            hole_mobility,
            dt: self.dt,
            steps: self.steps,
            trace_positions: self.trace_positions,
        }
    }

    /// Attach the integration time step
    pub fn with_time_step(self, dt: f64) -> Self {
        Self { dt, ..self }
    }

    /// Attach the number of integration steps
    pub fn with_step_count(self, steps: usize) -> Self {
        Self { steps, ..self }
    }

    /// Request per-step position snapshots in the run record
    pub fn with_position_trace(self, trace_positions: bool) -> Self {
        Self {
            trace_positions,
            ..self
        }
    }
}

impl<'a>
    TransientSolverBuilder<&'a Device<f64>, &'a MobilityCurve<f64>, &'a MobilityCurve<f64>>
{
    pub fn build(self) -> TransientSolver<'a> {
        TransientSolver {
            device: self.device,
            electron_mobility: self.electron_mobility,
            hole_mobility: self.hole_mobility,
            dt: self.dt,
            steps: self.steps,
            trace_positions: self.trace_positions,
        }
    }
}

/// A structure holding the information to carry out one transient run
pub struct TransientSolver<'a> {
    device: &'a Device<f64>,
    electron_mobility: &'a MobilityCurve<f64>,
    hole_mobility: &'a MobilityCurve<f64>,
    dt: f64,
    steps: usize,
    trace_positions: bool,
}

impl TransientSolver<'_> {
    fn mobility_for(&self, species: Species) -> &MobilityCurve<f64> {
        match species {
            Species::Electron => self.electron_mobility,
            Species::Hole => self.hole_mobility,
        }
    }

    /// Runs the fixed-length step loop over fresh populations built from `cloud`.
    ///
    /// One waveform sample is recorded per step, after every selected population
    /// has fully advanced.
    pub fn run(
        &self,
        cloud: &SampledCloud,
        selection: SpeciesSelection,
        rng: &mut (impl Rng + ?Sized),
    ) -> TransientRecord {
        let mut populations: Vec<CarrierPopulation> = selection
            .species()
            .iter()
            .map(|species| CarrierPopulation::from_cloud(cloud, *species))
            .collect();
        let integrator = DriftDiffusionIntegrator::new(self.device, self.dt);
        let mut accumulator = SignalAccumulator::new(self.device.collection_depth(), self.dt);
        let mut frames = Vec::new();

        for step in 0..self.steps {
            for population in populations.iter_mut() {
                let mobility = self.mobility_for(population.species());
                integrator.advance(population, mobility, rng);
            }
            let advanced: Vec<&CarrierPopulation> = populations.iter().collect();
            accumulator.record(&advanced);
            if self.trace_positions {
                frames.push(snapshot(step as f64 * self.dt, &populations));
            }
        }

        TransientRecord {
            waveform: accumulator.into_waveform(),
            frames,
        }
    }
}

fn snapshot(time: f64, populations: &[CarrierPopulation]) -> PositionFrame {
    let positions_of = |species: Species| {
        populations
            .iter()
            .filter(|p| p.species() == species)
            .flat_map(|p| p.iter().map(|c| c.position()))
            .collect()
    };
    PositionFrame {
        time,
        electrons: positions_of(Species::Electron),
        holes: positions_of(Species::Hole),
    }
}
