use std::f64::consts::PI;

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::{ProfileError, Result};

// ---------------------------------------------------------------------------
// Running sum
// ---------------------------------------------------------------------------

/// `c[i] = p[0] + ... + p[i]`.
pub fn cumulative_sum(samples: &[f64]) -> Vec<f64> {
    samples
        .iter()
        .scan(0.0, |acc, &v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Autocorrelation
// ---------------------------------------------------------------------------

/// Above this many samples the correlation is computed through the FFT.
pub const DIRECT_CORRELATION_LIMIT: usize = 4096;

/// Full autocorrelation of `samples` with itself, length `2N - 1`.
///
/// Index `k` holds lag `k - (N - 1)`, so the zero-lag (full overlap) tap sits
/// at index `N - 1`.  Small inputs are summed directly; large inputs go
/// through a zero-padded FFT.
pub fn full_autocorrelation(samples: &[f64]) -> Result<Vec<f64>> {
    let n = samples.len();
    if n == 0 {
        return Err(ProfileError::computation(
            "autocorrelation of an empty profile",
        ));
    }

    let lags = if n <= DIRECT_CORRELATION_LIMIT {
        direct_lags(samples)
    } else {
        fft_lags(samples)
    };

    let mut full = vec![0.0; 2 * n - 1];
    for (lag, &value) in lags.iter().enumerate() {
        full[n - 1 + lag] = value;
        full[n - 1 - lag] = value;
    }
    Ok(full)
}

/// Non-negative lag half of the full autocorrelation, divided by N.
pub fn autocorrelation_view(samples: &[f64]) -> Result<Vec<f64>> {
    let n = samples.len() as f64;
    let full = full_autocorrelation(samples)?;
    let center = full.len() / 2;
    Ok(full[center..].iter().map(|v| v / n).collect())
}

fn direct_lags(samples: &[f64]) -> Vec<f64> {
    let n = samples.len();
    (0..n)
        .map(|lag| {
            samples[..n - lag]
                .iter()
                .zip(&samples[lag..])
                .map(|(a, b)| a * b)
                .sum()
        })
        .collect()
}

fn fft_lags(samples: &[f64]) -> Vec<f64> {
    let n = samples.len();
    let size = (2 * n - 1).next_power_of_two();

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(size);
    let inverse = planner.plan_fft_inverse(size);

    let mut buffer: Vec<Complex<f64>> = samples
        .iter()
        .map(|&v| Complex::new(v, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(size)
        .collect();

    forward.process(&mut buffer);
    for bin in buffer.iter_mut() {
        *bin = Complex::new(bin.norm_sqr(), 0.0);
    }
    inverse.process(&mut buffer);

    // rustfft does not normalise the inverse transform.
    let scale = size as f64;
    buffer[..n].iter().map(|c| c.re / scale).collect()
}

// ---------------------------------------------------------------------------
// Welch power spectral density
// ---------------------------------------------------------------------------

/// Default Welch segment length.
pub const WELCH_SEGMENT_LEN: usize = 1024;

/// One-sided power spectral density estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Frequencies in cycles per sample (`fs = 1`).
    pub frequencies: Vec<f64>,
    /// Density values, same length as `frequencies`.
    pub psd: Vec<f64>,
}

/// Welch's averaged periodogram.
///
/// * periodic Hann window of `nperseg` samples (clamped to the input length)
/// * 50 % overlap, constant detrend per segment
/// * density scaling `1 / (fs * sum(w^2))`, one-sided, mean over segments
pub fn welch(samples: &[f64], nperseg: usize) -> Result<Spectrum> {
    let n = samples.len();
    if n == 0 {
        return Err(ProfileError::render("spectral density of an empty profile"));
    }
    if nperseg == 0 {
        return Err(ProfileError::render("Welch segment length must be positive"));
    }

    if nperseg > n {
        log::debug!("Welch segment length {nperseg} reduced to {n} (profile length)");
    }
    let nperseg = nperseg.min(n);
    let noverlap = nperseg / 2;
    let step = nperseg - noverlap;
    let n_segments = (n - noverlap) / step;

    let window = hann_periodic(nperseg);
    let scale = 1.0 / window.iter().map(|w| w * w).sum::<f64>();
    let n_bins = nperseg / 2 + 1;

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nperseg);

    let mut psd = vec![0.0; n_bins];
    let mut buffer = vec![Complex::new(0.0, 0.0); nperseg];

    for seg in 0..n_segments {
        let segment = &samples[seg * step..seg * step + nperseg];
        let mean = segment.iter().sum::<f64>() / nperseg as f64;
        for ((slot, &v), &w) in buffer.iter_mut().zip(segment).zip(&window) {
            *slot = Complex::new((v - mean) * w, 0.0);
        }
        fft.process(&mut buffer);

        for (k, acc) in psd.iter_mut().enumerate() {
            let mut power = buffer[k].norm_sqr() * scale;
            if is_doubled_bin(k, nperseg) {
                power *= 2.0;
            }
            *acc += power;
        }
    }

    for value in psd.iter_mut() {
        *value /= n_segments as f64;
    }

    let frequencies = (0..n_bins).map(|k| k as f64 / nperseg as f64).collect();
    Ok(Spectrum { frequencies, psd })
}

/// One-sided spectra fold negative frequencies onto every bin except DC and,
/// for even lengths, Nyquist.
fn is_doubled_bin(k: usize, nfft: usize) -> bool {
    if k == 0 {
        return false;
    }
    !(nfft % 2 == 0 && k == nfft / 2)
}

fn hann_periodic(len: usize) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }
    (0..len)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / len as f64).cos())
        .collect()
}
