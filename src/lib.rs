// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Tpa-tct is a transient-current simulator for optically excited semiconductor detectors
//!
//! # Overview
//! Tpa-tct predicts the current pulse induced on the electrodes of a biased detector
//! diode after excitation by a focussed, pulsed laser beam absorbed through the
//! two-photon process. Initial carrier positions are drawn by rejection sampling from
//! the squared-Gaussian-beam excitation profile, then advanced through a stochastic
//! drift-diffusion integration in the closed-form junction field. The induced current
//! follows from the Shockley-Ramo theorem with a uniform weighting field, and a scan
//! driver repeats the whole pipeline over a sweep of the beam focus depth to build
//! depth-response curves.
//!
//! # Usage
//! Tpa-tct is distributed as a binary crate, and is intended to be run from the command
//! line. To run the software first describe a simulation in a `.toml` file:
//!
//! ```toml
//! [device]
//! doping_concentration = 1.7e20
//! width = 50e-6
//! length = 50e-6
//! built_in_voltage = 3.0
//! bias_voltage = 450.0
//! resistance = 50.0
//! material = "SiC"
//!
//! [injection]
//! focus = 25e-6
//! wavelength = 400e-9
//! numerical_aperture = 0.15
//! refractive_index = 2.55
//! carrier_count = 5000
//! species = "both"
//!
//! [simulation]
//! steps = 2000
//! dt = 1e-12
//! probe_time = 0.5e-9
//! mode = "z_scan"
//! seed = 12345
//!
//! [scan]
//! start = 2e-6
//! stop = 48e-6
//! points = 50
//!
//! [mobility]
//! electron_table = "data/electron_mobility.csv"
//! hole_table = "data/hole_mobility.csv"
//! ```
//!
//! The mobility tables are two-column text files, field in MV / cm against drift
//! speed in cm / s. Omitting the seed draws one from entropy, so only seeded runs
//! are reproducible.

#![warn(missing_docs)]
#![allow(dead_code)]

/// The command line global application, tracing and result serialisation
pub mod app;

/// Physical constants
mod constants;

/// Device geometry, bias and material tables
pub mod device;

/// Error handling
mod error;

/// Closed-form junction field and beam-width helpers
pub mod fields;

/// Stochastic injection of the initial carrier distribution
pub mod injection;

/// Tabulated field to drift-speed curves
pub mod mobility;

/// Computes quantities of interest from waveforms, such as the collected charge
pub mod postprocessor;

/// The focus-depth sweep driver
pub mod scan;

/// Induced-signal synthesis through the Ramo theorem
pub mod signal;

/// The drift-diffusion transport engine
pub mod transport;

/// Helper functions
mod utilities;
