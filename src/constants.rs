// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Constants
//!
//! Defines physical constants and unit conversions used in the simulation

pub const ELECTRON_CHARGE: f64 = 1.60217662e-19; // Single electron charge in C
pub const EPSILON_0: f64 = 8.85418782e-12; // Permitivitty of free space in F / m

/// Converts a field in V / m to the MV / cm convention of tabulated mobility data
pub const V_PER_M_TO_MV_PER_CM: f64 = 1e-8;
/// Converts tabulated drift speeds in cm / s to m / s
pub const CM_PER_S_TO_M_PER_S: f64 = 1e-2;
