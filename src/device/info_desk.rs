//! Generates and returns compile-time defined material properties
//!
//! This module defines the `Material` enum which represents all materials implemented
//! in the simulation software, and the parameter table each variant resolves to.

use crate::error::ConfigurationError;
use nalgebra::RealField;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
/// Enum with all implemented detector materials
///
/// As materials may be added in future this is labelled as `non_exhaustive`
pub enum Material {
    SiC,
    Si,
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Material::SiC => {
                write!(f, "SiC")
            }
            Material::Si => {
                write!(f, "Si")
            }
        }
    }
}

impl std::str::FromStr for Material {
    type Err = ConfigurationError;

    /// Resolves a material tag from the configuration file.
    ///
    /// An unrecognised tag is a hard failure: substituting known-good defaults
    /// would let a typo silently simulate the wrong detector.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "SiC" => Ok(Material::SiC),
            "Si" => Ok(Material::Si),
            _ => Err(ConfigurationError::UnrecognisedMaterial(tag.to_string())),
        }
    }
}

impl Material {
    /// Builds an instance of `MaterialInfoDesk` for the given `Material` variant
    pub(crate) fn get_info<T: RealField>(&self) -> MaterialInfoDesk<T> {
        match self {
            Material::SiC => MaterialInfoDesk::silicon_carbide(),
            Material::Si => MaterialInfoDesk::silicon(),
        }
    }
}

/// Struct holding all the material information necessary to run a transient simulation
#[derive(Debug)]
pub struct MaterialInfoDesk<T: RealField> {
    /// Static relative permittivity
    pub(crate) permittivity: T,
    /// Electron diffusion constant in m^2 / s
    pub(crate) electron_diffusion_constant: T,
    /// Hole diffusion constant in m^2 / s
    pub(crate) hole_diffusion_constant: T,
    /// Electron lifetime in s
    pub(crate) electron_lifetime: T,
    /// Hole lifetime in s
    pub(crate) hole_lifetime: T,
}

impl<T: RealField> MaterialInfoDesk<T> {
    #[numeric_literals::replace_float_literals(T::from_f64(literal).unwrap())]
    fn silicon_carbide() -> Self {
        Self {
            permittivity: 9.72,
            electron_diffusion_constant: 22e-4,
            hole_diffusion_constant: 3e-4,
            electron_lifetime: 1e-9,
            hole_lifetime: 6e-7,
        }
    }

    #[numeric_literals::replace_float_literals(T::from_f64(literal).unwrap())]
    fn silicon() -> Self {
        Self {
            permittivity: 11.68,
            electron_diffusion_constant: 36e-4,
            hole_diffusion_constant: 12e-4,
            electron_lifetime: 1e-5,
            hole_lifetime: 1e-5,
        }
    }
}

#[cfg(test)]
mod test {
    use super::Material;
    use crate::error::ConfigurationError;
    use std::str::FromStr;

    #[test]
    fn known_material_tags_resolve() {
        assert_eq!(Material::from_str("SiC").unwrap(), Material::SiC);
        assert_eq!(Material::from_str("Si").unwrap(), Material::Si);
    }

    #[test]
    fn unrecognised_material_is_a_configuration_error() {
        let err = Material::from_str("GaAs").unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::UnrecognisedMaterial(tag) if tag == "GaAs"
        ));
    }

    #[test]
    fn silicon_carbide_table_matches_reference_values() {
        let info = Material::SiC.get_info::<f64>();
        assert_eq!(info.permittivity, 9.72);
        assert_eq!(info.electron_diffusion_constant, 22e-4);
        assert_eq!(info.hole_diffusion_constant, 3e-4);
    }
}
