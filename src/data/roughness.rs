use crate::error::{ProfileError, Result};

use super::model::{Profile, RoughnessMetrics};
use super::spectral::full_autocorrelation;

// ---------------------------------------------------------------------------
// Roughness statistics
// ---------------------------------------------------------------------------

/// Compute the seven roughness statistics of a profile.
///
/// Needs at least two samples: the gradient and the autocorrelation-based
/// spacing are undefined for a single point.
pub fn calculate_parameters(profile: &Profile) -> Result<RoughnessMetrics> {
    let samples = profile.samples();
    let n = samples.len();
    if n < 2 {
        return Err(ProfileError::computation(format!(
            "profile has {n} sample(s); at least 2 are needed for slope and correlation"
        )));
    }
    let len = n as f64;

    let ra = samples.iter().map(|v| v.abs()).sum::<f64>() / len;
    let rq = (samples.iter().map(|v| v * v).sum::<f64>() / len).sqrt();

    let rv = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let rp = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let rt = rp - rv;

    let slope = gradient(samples);
    let rms_slope = (slope.iter().map(|g| g * g).sum::<f64>() / len).sqrt();

    let sm = mean_spacing(samples)?;

    Ok(RoughnessMetrics {
        ra,
        rq,
        sm,
        rms_slope,
        rv,
        rp,
        rt,
    })
}

/// Mean spacing proxy: `N / argmax(full autocorrelation)`.
///
/// The zero-lag tap is always the largest value of an autocorrelation, so for
/// any non-zero profile the argmax is the centre index `N - 1` and the result
/// is `N / (N - 1)` regardless of the surface texture.  An all-zero profile
/// has its first maximum at index 0 and yields `+inf`.  Kept in this form so
/// reported values stay comparable with earlier results.
pub fn mean_spacing(samples: &[f64]) -> Result<f64> {
    let correlation = full_autocorrelation(samples)?;
    let peak = argmax(&correlation);
    Ok(samples.len() as f64 / peak as f64)
}

/// Index of the first occurrence of the maximum.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

/// Unit-spacing gradient: centred differences inside, one-sided at the ends.
pub fn gradient(samples: &[f64]) -> Vec<f64> {
    let n = samples.len();
    if n < 2 {
        return vec![0.0; n];
    }
    let mut out = Vec::with_capacity(n);
    out.push(samples[1] - samples[0]);
    out.extend(samples.windows(3).map(|w| (w[2] - w[0]) / 2.0));
    out.push(samples[n - 1] - samples[n - 2]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn profile(samples: &[f64]) -> Profile {
        Profile::new(samples.to_vec())
    }

    #[test]
    fn alternating_profile() {
        let p = profile(&[1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0]);
        let m = calculate_parameters(&p).unwrap();
        assert_eq!(m.ra, 1.0);
        assert_eq!(m.rq, 1.0);
        assert_eq!(m.rv, -1.0);
        assert_eq!(m.rp, 1.0);
        assert_eq!(m.rt, 2.0);
        // Ends: +-2, interior: (p[i+1] - p[i-1]) / 2 = 0
        assert_abs_diff_eq!(m.rms_slope, (8.0_f64 / 8.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn constant_profile_is_flat() {
        let p = profile(&[5.0; 5]);
        let m = calculate_parameters(&p).unwrap();
        assert_eq!(m.ra, 5.0);
        assert_eq!(m.rq, 5.0);
        assert_eq!(m.rv, 5.0);
        assert_eq!(m.rp, 5.0);
        assert_eq!(m.rt, 0.0);
        assert_eq!(m.rms_slope, 0.0);
    }

    #[test]
    fn spacing_always_hits_centre_tap() {
        let inputs: [&[f64]; 4] = [
            &[1.0, 2.0],
            &[0.3, -1.2, 4.4, 0.0, 2.2],
            &[5.0; 7],
            &[1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0],
        ];
        for samples in inputs {
            let n = samples.len() as f64;
            let m = calculate_parameters(&profile(samples)).unwrap();
            assert_eq!(m.sm, n / (n - 1.0), "input {samples:?}");
        }
    }

    #[test]
    fn zero_profile_spacing_is_infinite() {
        let m = calculate_parameters(&profile(&[0.0; 4])).unwrap();
        assert!(m.sm.is_infinite());
    }

    #[test]
    fn single_sample_is_a_computation_error() {
        let err = calculate_parameters(&profile(&[3.0])).unwrap_err();
        assert!(matches!(err, ProfileError::Computation(_)));
        let err = calculate_parameters(&profile(&[])).unwrap_err();
        assert!(matches!(err, ProfileError::Computation(_)));
    }

    #[test]
    fn gradient_uses_one_sided_ends() {
        assert_eq!(gradient(&[1.0, 2.0, 4.0, 7.0]), vec![1.0, 1.5, 2.5, 3.0]);
        assert_eq!(gradient(&[1.0, 3.0]), vec![2.0, 2.0]);
    }

    #[test]
    fn height_bounds_and_ordering() {
        let samples = [0.4, -2.1, 3.3, 0.0, -0.7, 1.9, 2.2, -1.4];
        let m = calculate_parameters(&profile(&samples)).unwrap();
        assert_eq!(m.rt, m.rp - m.rv);
        assert!(samples.iter().all(|&v| m.rv <= v && v <= m.rp));
        assert!(m.ra >= 0.0 && m.rq >= 0.0);
        assert!(m.rq >= m.ra);
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let p = profile(&[0.1, 0.7, -0.3, 0.25, -0.9, 0.05]);
        let a = calculate_parameters(&p).unwrap();
        let b = calculate_parameters(&p).unwrap();
        assert_eq!(a.ra.to_bits(), b.ra.to_bits());
        assert_eq!(a.rq.to_bits(), b.rq.to_bits());
        assert_eq!(a.sm.to_bits(), b.sm.to_bits());
        assert_eq!(a.rms_slope.to_bits(), b.rms_slope.to_bits());
    }
}
