use std::f64::consts::{PI, SQRT_2};

use crate::error::{ProfileError, Result};

// ---------------------------------------------------------------------------
// Waviness filter: 2nd-order Butterworth low-pass, applied zero-phase
// ---------------------------------------------------------------------------

/// Normalized cutoff of the waviness filter (Nyquist = 1.0).
pub const WAVINESS_CUTOFF: f64 = 0.1;

/// Transfer-function coefficients `b / a` with `a[0] == 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Coefficients {
    pub b: Vec<f64>,
    pub a: Vec<f64>,
}

impl Coefficients {
    /// Number of delay elements in the filter state.
    fn order(&self) -> usize {
        self.a.len().max(self.b.len()) - 1
    }

    /// Samples of odd extension added at each end by [`filtfilt`].
    pub fn padlen(&self) -> usize {
        3 * self.a.len().max(self.b.len())
    }
}

/// Second-order Butterworth low-pass designed by the bilinear transform with
/// frequency pre-warping.  `cutoff` is relative to Nyquist and must lie in
/// the open interval `(0, 1)`.
pub fn butter_lowpass(cutoff: f64) -> Result<Coefficients> {
    if !(cutoff > 0.0 && cutoff < 1.0) {
        return Err(ProfileError::render(format!(
            "low-pass cutoff {cutoff} must be between 0 and 1"
        )));
    }

    let k = (PI * cutoff / 2.0).tan();
    let k2 = k * k;
    let norm = 1.0 / (1.0 + SQRT_2 * k + k2);

    let b0 = k2 * norm;
    Ok(Coefficients {
        b: vec![b0, 2.0 * b0, b0],
        a: vec![1.0, 2.0 * (k2 - 1.0) * norm, (1.0 - SQRT_2 * k + k2) * norm],
    })
}

/// The waviness profile: [`butter_lowpass`] at [`WAVINESS_CUTOFF`], zero-phase.
pub fn waviness(samples: &[f64]) -> Result<Vec<f64>> {
    let coeffs = butter_lowpass(WAVINESS_CUTOFF)?;
    filtfilt(&coeffs, samples)
}

// ---------------------------------------------------------------------------
// Zero-phase filtering
// ---------------------------------------------------------------------------

/// Forward-backward filtering with odd end extension and steady-state
/// initial conditions.  Output has the input's length and no phase lag.
///
/// The input must be longer than [`Coefficients::padlen`].
pub fn filtfilt(coeffs: &Coefficients, samples: &[f64]) -> Result<Vec<f64>> {
    let padlen = coeffs.padlen();
    let n = samples.len();
    if n <= padlen {
        return Err(ProfileError::render(format!(
            "profile has {n} samples; the waviness filter needs more than {padlen}"
        )));
    }

    let extended = odd_extension(samples, padlen);
    let zi = lfilter_zi(coeffs);

    let start: Vec<f64> = zi.iter().map(|z| z * extended[0]).collect();
    let mut forward = lfilter(coeffs, &extended, start);

    forward.reverse();
    let start: Vec<f64> = zi.iter().map(|z| z * forward[0]).collect();
    let mut backward = lfilter(coeffs, &forward, start);
    backward.reverse();

    Ok(backward[padlen..padlen + n].to_vec())
}

/// Direct-form II transposed IIR filter starting from `state`.
fn lfilter(coeffs: &Coefficients, input: &[f64], mut state: Vec<f64>) -> Vec<f64> {
    let order = coeffs.order();
    let b = |i: usize| coeffs.b.get(i).copied().unwrap_or(0.0);
    let a = |i: usize| coeffs.a.get(i).copied().unwrap_or(0.0);

    input
        .iter()
        .map(|&x| {
            let y = b(0) * x + state.first().copied().unwrap_or(0.0);
            for i in 0..order {
                let next = state.get(i + 1).copied().unwrap_or(0.0);
                state[i] = b(i + 1) * x + next - a(i + 1) * y;
            }
            y
        })
        .collect()
}

/// Filter state matching the steady-state response to a unit step.
///
/// With DC gain `g = sum(b) / sum(a)` the transposed-form delays settle at
/// `z[i] = sum_{k > i} (b[k] - a[k] * g)`.
fn lfilter_zi(coeffs: &Coefficients) -> Vec<f64> {
    let order = coeffs.order();
    let b = |i: usize| coeffs.b.get(i).copied().unwrap_or(0.0);
    let a = |i: usize| coeffs.a.get(i).copied().unwrap_or(0.0);
    let gain = coeffs.b.iter().sum::<f64>() / coeffs.a.iter().sum::<f64>();

    let mut zi = vec![0.0; order];
    let mut acc = 0.0;
    for i in (0..order).rev() {
        acc += b(i + 1) - a(i + 1) * gain;
        zi[i] = acc;
    }
    zi
}

/// Point-symmetric extension of `padlen` samples about each end value.
fn odd_extension(samples: &[f64], padlen: usize) -> Vec<f64> {
    let n = samples.len();
    let first = samples[0];
    let last = samples[n - 1];

    let mut out = Vec::with_capacity(n + 2 * padlen);
    out.extend((1..=padlen).rev().map(|i| 2.0 * first - samples[i]));
    out.extend_from_slice(samples);
    out.extend((1..=padlen).map(|i| 2.0 * last - samples[n - 1 - i]));
    out
}
