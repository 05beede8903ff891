//! Induced-signal synthesis
//!
//! Converts microscopic carrier motion into the macroscopic electrode current
//! through the Shockley-Ramo theorem with a spatially uniform weighting field,
//! normalised by the collection depth.

use crate::injection::{CarrierPopulation, Species};

/// The transient-current record of one run.
///
/// One sample per integration step, `time = step_index * dt`, split by species
/// with the total alongside.
#[derive(Clone, Debug, Default)]
pub struct Waveform {
    times: Vec<f64>,
    electron: Vec<f64>,
    hole: Vec<f64>,
    total: Vec<f64>,
}

impl Waveform {
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn electron_current(&self) -> &[f64] {
        &self.electron
    }

    pub fn hole_current(&self) -> &[f64] {
        &self.hole
    }

    pub fn total_current(&self) -> &[f64] {
        &self.total
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Accumulates one induced-current sample per integration step
#[derive(Debug)]
pub struct SignalAccumulator {
    collection_depth: f64,
    dt: f64,
    waveform: Waveform,
}

impl SignalAccumulator {
    pub fn new(collection_depth: f64, dt: f64) -> Self {
        Self {
            collection_depth,
            dt,
            waveform: Waveform::default(),
        }
    }

    /// Records the instantaneous current induced by the given populations.
    ///
    /// Must only be called once all carriers have been advanced for the step:
    /// the sum below reads every velocity, racing it against updates would tear
    /// the sample.
    pub fn record(&mut self, populations: &[&CarrierPopulation]) {
        let time = self.waveform.times.len() as f64 * self.dt;
        let mut electron = 0.;
        let mut hole = 0.;
        for population in populations {
            let current = population
                .iter()
                .map(|carrier| carrier.species().charge() * carrier.velocity().y)
                .sum::<f64>()
                / self.collection_depth;
            match population.species() {
                Species::Electron => electron += current,
                Species::Hole => hole += current,
            }
        }
        self.waveform.times.push(time);
        self.waveform.electron.push(electron);
        self.waveform.hole.push(hole);
        self.waveform.total.push(electron + hole);
    }

    pub fn into_waveform(self) -> Waveform {
        self.waveform
    }
}
