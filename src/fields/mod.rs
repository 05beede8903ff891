//! Closed-form electrostatics for the biased diode
//!
//! The longitudinal field is a piecewise-linear approximation along the depth
//! axis: the lateral coordinate only gates the rectangular support. Two regimes
//! are distinguished by comparing the bias to the depletion voltage. This is not
//! a Poisson solution, it is the standard abrupt-junction result evaluated in
//! closed form.

use crate::device::Device;
use nalgebra::RealField;
use num_traits::NumCast;

/// Evaluates the longitudinal electric field at `(x, y)` in V / m.
///
/// Over-depleted devices (`V_bias >= V_depletion`) carry a field across the full
/// physical width, under-depleted devices only across the depleted width. Outside
/// the supported rectangle the field vanishes.
pub fn linear_field<T: Copy + RealField>(x: T, y: T, device: &Device<T>) -> T {
    let two = T::one() + T::one();
    let v_bias = device.bias_voltage();
    let v_d = device.depletion_voltage();
    let v_bi = device.built_in_voltage();
    let y_lim = device.depleted_width();
    let diode_w = device.physical_width();
    let diode_l = device.physical_length();

    if v_bias >= v_d {
        if y > diode_w || y < T::zero() || x < -diode_l / two || x > diode_l / two {
            return T::zero();
        }
        let e0 = two * (v_d + v_bi) / diode_w;
        let e1 = (v_bias - v_d - v_bi) / diode_w;
        e0 * (T::one() - y / diode_w) + e1
    } else {
        if y > y_lim || y < T::zero() || x < -diode_l / two || x > diode_l / two {
            return T::zero();
        }
        two * (v_bias + v_bi) * (T::one() - y / y_lim) / y_lim
    }
}

/// Width of the focussed Gaussian beam at depth `y`.
///
/// `w(y) = sqrt((lambda / (pi NA))^2 + ((y - focus) NA / n)^2)`, the waist sits
/// at the focus depth and broadens linearly in the far field.
pub fn beam_width<T: Copy + RealField>(
    y: T,
    focus: T,
    wavelength: T,
    numerical_aperture: T,
    refractive_index: T,
) -> T {
    let waist = wavelength / (T::pi() * numerical_aperture);
    let spread = (y - focus) * numerical_aperture / refractive_index;
    (waist * waist + spread * spread).sqrt()
}

/// A sampled map of the field over a rectangular window, for external rendering
#[derive(Debug)]
pub struct FieldMap<T> {
    pub x: Vec<T>,
    pub y: Vec<T>,
    /// Field values in row-major order, `field[i * y.len() + j] = E(x[i], y[j])`
    pub field: Vec<T>,
}

/// Samples `linear_field` on an `nx` by `ny` grid spanning the given window
pub fn field_map<T: Copy + RealField + NumCast>(
    x_range: (T, T),
    y_range: (T, T),
    nx: usize,
    ny: usize,
    device: &Device<T>,
) -> FieldMap<T> {
    let x = crate::utilities::linspace(x_range.0, x_range.1, nx);
    let y = crate::utilities::linspace(y_range.0, y_range.1, ny);
    let mut field = Vec::with_capacity(nx * ny);
    for &xi in &x {
        for &yj in &y {
            field.push(linear_field(xi, yj, device));
        }
    }
    FieldMap { x, y, field }
}

#[cfg(test)]
mod test {
    use super::{beam_width, field_map, linear_field};
    use crate::device::{Device, Material};
    use approx::assert_relative_eq;

    fn over_depleted_device() -> Device<f64> {
        // 450 V bias against a ~392 V depletion voltage
        Device::new(1.7e20, 50e-6, 50e-6, 3., 450., 50., Material::SiC)
    }

    fn under_depleted_device() -> Device<f64> {
        let mut device = over_depleted_device();
        device.set_bias_voltage(100.);
        device
    }

    #[test]
    fn field_vanishes_outside_the_device_rectangle() {
        let device = over_depleted_device();
        assert_eq!(linear_field(0., -1e-6, &device), 0.);
        assert_eq!(linear_field(0., 51e-6, &device), 0.);
        assert_eq!(linear_field(-26e-6, 25e-6, &device), 0.);
        assert_eq!(linear_field(26e-6, 25e-6, &device), 0.);
    }

    #[test]
    fn over_depleted_field_is_affine_in_depth() {
        let device = over_depleted_device();
        let e = |y| linear_field(0., y, &device);
        let w = device.physical_width();
        // Three equidistant samples of an affine function are collinear
        assert_relative_eq!(
            e(0.25 * w) - e(0.5 * w),
            e(0.5 * w) - e(0.75 * w),
            max_relative = 1e-10
        );
        // And the end points follow the closed form
        let v_d = device.depletion_voltage();
        let e0 = 2. * (v_d + 3.) / w;
        let e1 = (450. - v_d - 3.) / w;
        assert_relative_eq!(e(0.), e0 + e1, max_relative = 1e-12);
        assert_relative_eq!(e(w), e1, max_relative = 1e-6);
    }

    #[test]
    fn under_depleted_field_is_confined_to_the_depleted_width() {
        let device = under_depleted_device();
        let y_lim = device.depleted_width();
        assert!(y_lim < device.physical_width());
        assert!(linear_field(0., 0.5 * y_lim, &device) > 0.);
        assert_eq!(linear_field(0., 1.01 * y_lim, &device), 0.);
        // Linear ramp to zero at the depletion edge
        assert_relative_eq!(
            linear_field(0., 0., &device),
            2. * (100. + 3.) / y_lim,
            max_relative = 1e-12
        );
        assert_relative_eq!(linear_field(0., y_lim, &device), 0., epsilon = 1e-6);
    }

    #[test]
    fn beam_width_reaches_the_waist_at_the_focus() {
        let (focus, lambda, na, n) = (25e-6, 400e-9, 0.15, 2.55);
        let waist = lambda / (std::f64::consts::PI * na);
        assert_relative_eq!(beam_width(focus, focus, lambda, na, n), waist);
        assert!(beam_width(focus + 10e-6, focus, lambda, na, n) > waist);
        assert!(beam_width(focus - 10e-6, focus, lambda, na, n) > waist);
    }

    #[test]
    fn field_map_covers_the_requested_grid() {
        let device = over_depleted_device();
        let map = field_map((-25e-6, 25e-6), (0., 50e-6), 11, 21, &device);
        assert_eq!(map.x.len(), 11);
        assert_eq!(map.y.len(), 21);
        assert_eq!(map.field.len(), 11 * 21);
        assert_relative_eq!(
            map.field[5 * 21 + 10],
            linear_field(map.x[5], map.y[10], &device)
        );
    }
}
