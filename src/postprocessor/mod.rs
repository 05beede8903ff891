//! Computes quantities of interest from transient waveforms, such as the
//! collected charge and the weighted pulse charge

use crate::signal::Waveform;
use crate::utilities;

/// Charge collected over the transient, per species and in total
#[derive(Clone, Copy, Debug)]
pub struct CollectedCharge {
    pub electron: f64,
    pub hole: f64,
    pub total: f64,
}

/// Integrates the waveform channels over time with the trapezoid rule
pub fn collected_charge(waveform: &Waveform) -> CollectedCharge {
    CollectedCharge {
        electron: utilities::trapezoid(waveform.times(), waveform.electron_current()),
        hole: utilities::trapezoid(waveform.times(), waveform.hole_current()),
        total: utilities::trapezoid(waveform.times(), waveform.total_current()),
    }
}

/// The total current interpolated at the probe time.
///
/// Uses the same clamped linear interpolation as the mobility lookups, so probe
/// times outside the simulated window return the first or last sample.
pub fn weighted_pulse_charge(waveform: &Waveform, probe_time: f64) -> f64 {
    utilities::linear_interpolation(waveform.times(), waveform.total_current(), probe_time)
}
