//! Carrier records and the per-species population arena

use super::SampledCloud;
use crate::constants::ELECTRON_CHARGE;
use crate::device::Device;
use nalgebra::Vector2;

/// The two simulated carrier species
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Species {
    Electron,
    Hole,
}

impl Species {
    /// Sign of the drift direction along the depth axis.
    ///
    /// The two species transport towards opposite contacts: electrons towards
    /// the illuminated junction at zero depth, holes towards the back contact.
    pub(crate) fn drift_sign(&self) -> f64 {
        match self {
            Species::Electron => -1.,
            Species::Hole => 1.,
        }
    }

    /// Signed carrier charge in C
    pub(crate) fn charge(&self) -> f64 {
        match self {
            Species::Electron => -ELECTRON_CHARGE,
            Species::Hole => ELECTRON_CHARGE,
        }
    }

    /// Diffusion constant of this species in the device material, m^2 / s
    pub fn diffusion_constant(&self, device: &Device<f64>) -> f64 {
        match self {
            Species::Electron => device.electron_diffusion_constant(),
            Species::Hole => device.hole_diffusion_constant(),
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Species::Electron => write!(f, "electron"),
            Species::Hole => write!(f, "hole"),
        }
    }
}

/// Which populations a run should simulate
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeciesSelection {
    #[serde(alias = "electron")]
    Electrons,
    #[serde(alias = "hole")]
    Holes,
    Both,
}

impl SpeciesSelection {
    /// The species simulated under this selection, in accumulation order
    pub fn species(&self) -> &'static [Species] {
        match self {
            SpeciesSelection::Electrons => &[Species::Electron],
            SpeciesSelection::Holes => &[Species::Hole],
            SpeciesSelection::Both => &[Species::Electron, Species::Hole],
        }
    }
}

/// A single simulated charge carrier
#[derive(Clone, Debug)]
pub struct Carrier {
    position: Vector2<f64>,
    velocity: Vector2<f64>,
    species: Species,
}

impl Carrier {
    /// Creates a carrier at rest at `(x, y)`
    pub fn new(x: f64, y: f64, species: Species) -> Self {
        Self {
            position: Vector2::new(x, y),
            velocity: Vector2::zeros(),
            species,
        }
    }

    /// Displaces the carrier. The arguments are deltas ADDED to the current
    /// position, this is a relative movement and never an absolute one.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.position.x += dx;
        self.position.y += dy;
    }

    /// Overwrites the carrier drift velocity
    pub fn set_velocity(&mut self, vx: f64, vy: f64) {
        self.velocity.x = vx;
        self.velocity.y = vy;
    }

    pub fn position(&self) -> Vector2<f64> {
        self.position
    }

    pub fn velocity(&self) -> Vector2<f64> {
        self.velocity
    }

    pub fn species(&self) -> Species {
        self.species
    }
}

/// The live set of carriers of one species.
///
/// Carriers are held by value in a contiguous arena and identified by index,
/// no carrier outlives its owning population.
#[derive(Clone, Debug)]
pub struct CarrierPopulation {
    species: Species,
    pub(crate) carriers: Vec<Carrier>,
}

impl CarrierPopulation {
    /// Builds a population of the given species from sampled injection geometry.
    ///
    /// Electron and hole populations are constructed independently from the same
    /// cloud, each call owns a fresh set of carriers at rest.
    pub fn from_cloud(cloud: &SampledCloud, species: Species) -> Self {
        Self {
            species,
            carriers: cloud
                .positions()
                .iter()
                .map(|p| Carrier::new(p.x, p.y, species))
                .collect(),
        }
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn len(&self) -> usize {
        self.carriers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carriers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Carrier> {
        self.carriers.iter()
    }
}
