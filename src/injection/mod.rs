//! Stochastic generation of the initial carrier distribution
//!
//! Two-photon absorption deposits carriers with a density proportional to the
//! squared beam intensity. For a focussed Gaussian beam this falls off as
//! `1 / w(y)^3` along the depth axis, with a per-depth Gaussian of width
//! `w(y) / sqrt(8)` across the lateral axis. Initial positions are drawn from
//! this density by rejection sampling against the narrowest beam cross-section,
//! found with a grid search over the support.
//!
//! A sampler is constructed through the `BeamSamplerBuilder` as
//!
//! ```ignore
//! let sampler = BeamSamplerBuilder::new()
//!     .with_focus(25e-6)
//!     .with_wavelength(400e-9)
//!     .with_numerical_aperture(0.15)
//!     .with_refractive_index(2.55)
//!     .with_support((0., 50e-6))
//!     .with_sample_count(5000)
//!     .build();
//! let cloud = sampler.sample(&mut rng)?;
//! ```
//!
//! and is fully determined by the supplied random source: reruns with the same
//! seed reproduce the same cloud bit for bit.

mod population;

pub use population::{Carrier, CarrierPopulation, Species, SpeciesSelection};

use crate::error::SamplingError;
use crate::fields::beam_width;
use crate::utilities::linspace;
use nalgebra::Vector2;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Number of support points examined when bounding the rejection envelope
const ENVELOPE_SEARCH_POINTS: usize = 2000;

/// The sampled injection geometry, shared by both species' populations
#[derive(Clone, Debug)]
pub struct SampledCloud {
    positions: Vec<Vector2<f64>>,
}

impl SampledCloud {
    pub(crate) fn from_positions(positions: Vec<Vector2<f64>>) -> Self {
        Self { positions }
    }

    pub fn positions(&self) -> &[Vector2<f64>] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Builder for `BeamSampler`, the support and sample count must both be attached
pub struct BeamSamplerBuilder<Support, Count> {
    focus: f64,
    wavelength: f64,
    numerical_aperture: f64,
    refractive_index: f64,
    support: Support,
    sample_count: Count,
}

impl BeamSamplerBuilder<(), ()> {
    /// Initialise an empty BeamSamplerBuilder
    pub fn new() -> Self {
        Self {
            focus: 0.,
            wavelength: 0.,
            numerical_aperture: 0.,
            refractive_index: 1.,
            support: (),
            sample_count: (),
        }
    }
}

impl Default for BeamSamplerBuilder<(), ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Support, Count> BeamSamplerBuilder<Support, Count> {
    /// Attach the focus depth of the beam
    pub fn with_focus(self, focus: f64) -> Self {
        Self { focus, ..self }
    }

    /// Attach the vacuum wavelength of the excitation
    pub fn with_wavelength(self, wavelength: f64) -> Self {
        Self { wavelength, ..self }
    }

    /// Attach the numerical aperture of the focussing optics
    pub fn with_numerical_aperture(self, numerical_aperture: f64) -> Self {
        Self {
            numerical_aperture,
            ..self
        }
    }

    /// Attach the refractive index of the device material
    pub fn with_refractive_index(self, refractive_index: f64) -> Self {
        Self {
            refractive_index,
            ..self
        }
    }

    /// Attach the depth interval carriers may be generated in
    pub fn with_support(self, support: (f64, f64)) -> BeamSamplerBuilder<(f64, f64), Count> {
        BeamSamplerBuilder {
            focus: self.focus,
            wavelength: self.wavelength,
            numerical_aperture: self.numerical_aperture,
            refractive_index: self.refractive_index,
            support,
            sample_count: self.sample_count,
        }
    }

    /// Attach the number of carriers to draw
    pub fn with_sample_count(self, sample_count: usize) -> BeamSamplerBuilder<Support, usize> {
        BeamSamplerBuilder {
            focus: self.focus,
            wavelength: self.wavelength,
            numerical_aperture: self.numerical_aperture,
            refractive_index: self.refractive_index,
            support: self.support,
            sample_count,
        }
    }
}

impl BeamSamplerBuilder<(f64, f64), usize> {
    pub fn build(self) -> BeamSampler {
        BeamSampler {
            focus: self.focus,
            wavelength: self.wavelength,
            numerical_aperture: self.numerical_aperture,
            refractive_index: self.refractive_index,
            support: self.support,
            sample_count: self.sample_count,
        }
    }
}

/// Draws initial carrier positions from the two-photon excitation profile
#[derive(Debug)]
pub struct BeamSampler {
    focus: f64,
    wavelength: f64,
    numerical_aperture: f64,
    refractive_index: f64,
    support: (f64, f64),
    sample_count: usize,
}

impl BeamSampler {
    fn width_at(&self, y: f64) -> f64 {
        beam_width(
            y,
            self.focus,
            self.wavelength,
            self.numerical_aperture,
            self.refractive_index,
        )
    }

    /// Bounds the rejection envelope with the narrowest cross-section on the support
    fn narrowest_width(&self) -> Result<f64, SamplingError> {
        let (start, end) = self.support;
        let mut narrowest = f64::INFINITY;
        for y in linspace(start, end, ENVELOPE_SEARCH_POINTS) {
            let w = self.width_at(y);
            if !w.is_finite() || w <= 0. {
                return Err(SamplingError::DegenerateBeamWidth { depth: y });
            }
            narrowest = narrowest.min(w);
        }
        if !narrowest.is_finite() || narrowest <= 0. {
            return Err(SamplingError::EnvelopeSearchFailed { start, end });
        }
        Ok(narrowest)
    }

    /// Draws exactly `sample_count` positions from the excitation density.
    ///
    /// Depths are rejection-sampled against the `1 / w^3` profile, the lateral
    /// coordinate of each accepted depth is then a centred Gaussian of standard
    /// deviation `w(y) / sqrt(8)`.
    pub fn sample(&self, rng: &mut (impl Rng + ?Sized)) -> Result<SampledCloud, SamplingError> {
        if self.sample_count == 0 {
            return Err(SamplingError::EmptyRequest);
        }
        let narrowest = self.narrowest_width()?;
        let (y_min, y_max) = self.support;

        let mut positions = Vec::with_capacity(self.sample_count);
        while positions.len() < self.sample_count {
            let y = rng.gen_range(y_min..y_max);
            let w = self.width_at(y);
            if !w.is_finite() || w <= 0. {
                return Err(SamplingError::DegenerateBeamWidth { depth: y });
            }
            // Accept with probability (1/w^3) / (1/w_min^3)
            if rng.gen::<f64>() <= (narrowest / w).powi(3) {
                let sigma = w / 8f64.sqrt();
                let lateral = Normal::new(0., sigma)
                    .map_err(|_| SamplingError::DegenerateBeamWidth { depth: y })?;
                positions.push(Vector2::new(lateral.sample(rng), y));
            }
        }
        Ok(SampledCloud { positions })
    }
}

#[cfg(test)]
mod test {
    use super::{BeamSampler, BeamSamplerBuilder};
    use crate::error::SamplingError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn reference_sampler(count: usize) -> BeamSampler {
        BeamSamplerBuilder::new()
            .with_focus(25e-6)
            .with_wavelength(400e-9)
            .with_numerical_aperture(0.15)
            .with_refractive_index(2.55)
            .with_support((0., 50e-6))
            .with_sample_count(count)
            .build()
    }

    #[test]
    fn a_fixed_seed_produces_exactly_the_requested_count_inside_the_support() {
        let sampler = reference_sampler(500);
        let cloud = sampler.sample(&mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(cloud.len(), 500);
        assert!(cloud
            .positions()
            .iter()
            .all(|p| (0. ..=50e-6).contains(&p.y)));
    }

    #[test]
    fn reruns_with_the_same_seed_are_identical() {
        let sampler = reference_sampler(200);
        let first = sampler.sample(&mut StdRng::seed_from_u64(99)).unwrap();
        let second = sampler.sample(&mut StdRng::seed_from_u64(99)).unwrap();
        for (a, b) in first.positions().iter().zip(second.positions()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn the_depth_distribution_concentrates_at_the_focus() {
        let sampler = reference_sampler(4000);
        let cloud = sampler.sample(&mut StdRng::seed_from_u64(3)).unwrap();
        let near_focus = cloud
            .positions()
            .iter()
            .filter(|p| (p.y - 25e-6).abs() < 5e-6)
            .count();
        let near_surface = cloud
            .positions()
            .iter()
            .filter(|p| p.y < 10e-6)
            .count();
        // A 10 um band at the focus must collect far more carriers than an
        // equally wide band at the surface
        assert!(near_focus > 3 * near_surface.max(1));
    }

    #[test]
    fn the_depth_histogram_follows_the_inverse_cubed_width_profile() {
        let sampler = reference_sampler(4000);
        let cloud = sampler.sample(&mut StdRng::seed_from_u64(21)).unwrap();

        let band_count = |lo: f64, hi: f64| {
            cloud
                .positions()
                .iter()
                .filter(|p| p.y >= lo && p.y < hi)
                .count() as f64
        };
        // Expected band weights from numerically integrating 1 / w(y)^3
        let band_weight = |lo: f64, hi: f64| {
            crate::utilities::linspace(lo, hi, 1000)
                .into_iter()
                .map(|y| {
                    crate::fields::beam_width(y, 25e-6, 400e-9, 0.15, 2.55).powi(-3)
                })
                .sum::<f64>()
        };

        let empirical = band_count(20e-6, 30e-6) / band_count(0., 10e-6);
        let expected = band_weight(20e-6, 30e-6) / band_weight(0., 10e-6);
        assert!(
            (empirical / expected - 1.).abs() < 0.25,
            "band ratio {empirical} deviates from the profile prediction {expected}"
        );
    }

    #[test]
    fn a_divergent_beam_width_is_a_sampling_error() {
        let sampler = BeamSamplerBuilder::new()
            .with_focus(25e-6)
            .with_wavelength(400e-9)
            .with_numerical_aperture(0.)
            .with_refractive_index(2.55)
            .with_support((0., 50e-6))
            .with_sample_count(10)
            .build();
        let err = sampler.sample(&mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, SamplingError::DegenerateBeamWidth { .. }));
    }

    #[test]
    fn a_zero_sample_request_is_rejected() {
        let sampler = reference_sampler(0);
        let err = sampler.sample(&mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, SamplingError::EmptyRequest));
    }
}
