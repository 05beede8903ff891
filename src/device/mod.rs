//! Controls the construction and storage of the top-level device structure,
//! and the info-desk tables which yield all the material information necessary
//! to run the simulation

/// The info-desk tables which describe the material parameters used in the simulation
pub mod info_desk;

pub use info_desk::Material;
use info_desk::MaterialInfoDesk;

use crate::constants::{ELECTRON_CHARGE, EPSILON_0};
use nalgebra::RealField;

/// The biased detector diode.
///
/// Holds the geometry and bias point together with the electrostatic quantities
/// derived from the depleted-diode approximation. The derived quantities are
/// recomputed in every setter so an accessor can never observe a depleted width
/// or depletion voltage which is stale with respect to the inputs.
#[derive(Debug)]
pub struct Device<T: Copy + RealField> {
    doping_concentration: T,
    physical_width: T,
    physical_length: T,
    built_in_voltage: T,
    bias_voltage: T,
    resistance: T,
    capacitance: T,
    material: Material,
    info: MaterialInfoDesk<T>,
    depleted_width: T,
    depletion_voltage: T,
}

impl<T: Copy + RealField> Device<T> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        doping_concentration: T,
        physical_width: T,
        physical_length: T,
        built_in_voltage: T,
        bias_voltage: T,
        resistance: T,
        material: Material,
    ) -> Self {
        let info = material.get_info();
        let mut device = Self {
            doping_concentration,
            physical_width,
            physical_length,
            built_in_voltage,
            bias_voltage,
            resistance,
            capacitance: T::from_f64(1.6111e-12).unwrap(),
            material,
            info,
            depleted_width: T::zero(),
            depletion_voltage: T::zero(),
        };
        device.device_has_been_modified();
        device
    }

    fn calculate_depleted_width(&self) -> T {
        let q = T::from_f64(ELECTRON_CHARGE).unwrap();
        let eps_0 = T::from_f64(EPSILON_0).unwrap();
        let two = T::one() + T::one();
        (two * self.info.permittivity * eps_0 * self.bias_voltage
            / (q * self.doping_concentration))
            .sqrt()
    }

    fn calculate_depletion_voltage(&self) -> T {
        let q = T::from_f64(ELECTRON_CHARGE).unwrap();
        let eps_0 = T::from_f64(EPSILON_0).unwrap();
        let two = T::one() + T::one();
        q * self.doping_concentration * self.physical_width * self.physical_width
            / (two * eps_0 * self.info.permittivity)
            - self.built_in_voltage
    }

    fn device_has_been_modified(&mut self) {
        self.info = self.material.get_info();
        self.depleted_width = self.calculate_depleted_width();
        self.depletion_voltage = self.calculate_depletion_voltage();
    }

    pub fn set_doping_concentration(&mut self, doping_concentration: T) {
        self.doping_concentration = doping_concentration;
        self.device_has_been_modified();
    }

    pub fn set_physical_width(&mut self, physical_width: T) {
        self.physical_width = physical_width;
        self.device_has_been_modified();
    }

    pub fn set_physical_length(&mut self, physical_length: T) {
        self.physical_length = physical_length;
        self.device_has_been_modified();
    }

    pub fn set_bias_voltage(&mut self, bias_voltage: T) {
        self.bias_voltage = bias_voltage;
        self.device_has_been_modified();
    }

    pub fn set_built_in_voltage(&mut self, built_in_voltage: T) {
        self.built_in_voltage = built_in_voltage;
        self.device_has_been_modified();
    }

    pub fn set_resistance(&mut self, resistance: T) {
        self.resistance = resistance;
        self.device_has_been_modified();
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
        self.device_has_been_modified();
    }

    pub fn doping_concentration(&self) -> T {
        self.doping_concentration
    }

    pub fn physical_width(&self) -> T {
        self.physical_width
    }

    pub fn physical_length(&self) -> T {
        self.physical_length
    }

    pub fn built_in_voltage(&self) -> T {
        self.built_in_voltage
    }

    pub fn bias_voltage(&self) -> T {
        self.bias_voltage
    }

    pub fn resistance(&self) -> T {
        self.resistance
    }

    pub fn capacitance(&self) -> T {
        self.capacitance
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn permittivity(&self) -> T {
        self.info.permittivity
    }

    pub fn electron_diffusion_constant(&self) -> T {
        self.info.electron_diffusion_constant
    }

    pub fn hole_diffusion_constant(&self) -> T {
        self.info.hole_diffusion_constant
    }

    pub fn electron_lifetime(&self) -> T {
        self.info.electron_lifetime
    }

    pub fn hole_lifetime(&self) -> T {
        self.info.hole_lifetime
    }

    pub fn depleted_width(&self) -> T {
        self.depleted_width
    }

    pub fn depletion_voltage(&self) -> T {
        self.depletion_voltage
    }

    /// Depth of the collecting region, the lesser of the depleted and physical widths.
    ///
    /// Carriers beyond this depth no longer induce signal, and the uniform Ramo
    /// weighting field is normalised by this length.
    pub fn collection_depth(&self) -> T {
        if self.depleted_width < self.physical_width {
            self.depleted_width
        } else {
            self.physical_width
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Device, Material};
    use crate::constants::{ELECTRON_CHARGE, EPSILON_0};
    use approx::assert_relative_eq;

    fn reference_device() -> Device<f64> {
        Device::new(1.7e20, 50e-6, 50e-6, 3., 450., 50., Material::SiC)
    }

    #[test]
    fn derived_quantities_follow_the_depleted_diode_expressions() {
        let device = reference_device();
        let expected_width =
            (2. * 9.72 * EPSILON_0 * 450. / (ELECTRON_CHARGE * 1.7e20)).sqrt();
        let expected_voltage =
            ELECTRON_CHARGE * 1.7e20 * 50e-6 * 50e-6 / (2. * EPSILON_0 * 9.72) - 3.;
        assert_relative_eq!(device.depleted_width(), expected_width, max_relative = 1e-12);
        assert_relative_eq!(
            device.depletion_voltage(),
            expected_voltage,
            max_relative = 1e-12
        );
    }

    #[test]
    fn changing_the_bias_recomputes_the_derived_quantities() {
        let mut device = reference_device();
        let width_at_450 = device.depleted_width();
        device.set_bias_voltage(100.);
        assert_relative_eq!(
            device.depleted_width(),
            width_at_450 * (100f64 / 450.).sqrt(),
            max_relative = 1e-12
        );
        // The depletion voltage is bias-independent but must still be re-derived
        let expected_voltage =
            ELECTRON_CHARGE * 1.7e20 * 50e-6 * 50e-6 / (2. * EPSILON_0 * 9.72) - 3.;
        assert_relative_eq!(
            device.depletion_voltage(),
            expected_voltage,
            max_relative = 1e-12
        );
    }

    #[test]
    fn changing_the_width_recomputes_the_depletion_voltage() {
        let mut device = reference_device();
        let voltage_at_50um = device.depletion_voltage();
        device.set_physical_width(100e-6);
        assert_relative_eq!(
            device.depletion_voltage() + 3.,
            (voltage_at_50um + 3.) * 4.,
            max_relative = 1e-12
        );
    }

    #[test]
    fn collection_depth_is_bounded_by_the_physical_width() {
        let device = reference_device();
        // At 450 V bias the reference SiC diode is over-depleted
        assert!(device.depleted_width() > device.physical_width());
        assert_relative_eq!(device.collection_depth(), device.physical_width());

        let mut device = reference_device();
        device.set_bias_voltage(10.);
        assert!(device.depleted_width() < device.physical_width());
        assert_relative_eq!(device.collection_depth(), device.depleted_width());
    }
}
