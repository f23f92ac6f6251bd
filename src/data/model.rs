use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Profile – the loaded height samples
// ---------------------------------------------------------------------------

/// Equally spaced surface-height samples (unit spacing).
///
/// The samples are private and only exposed as a slice, so a profile can not
/// be changed once the loader has built it.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    samples: Vec<f64>,
}

impl Profile {
    pub fn new(samples: Vec<f64>) -> Self {
        Profile { samples }
    }

    /// Height samples in acquisition order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the profile holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl From<Vec<f64>> for Profile {
    fn from(samples: Vec<f64>) -> Self {
        Profile::new(samples)
    }
}

// ---------------------------------------------------------------------------
// RoughnessMetrics – scalar statistics
// ---------------------------------------------------------------------------

/// The seven roughness statistics, serialised under their customary names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoughnessMetrics {
    /// Arithmetic mean of absolute heights.
    #[serde(rename = "Ra")]
    pub ra: f64,
    /// Root-mean-square height.
    #[serde(rename = "Rq")]
    pub rq: f64,
    /// Mean spacing proxy (see [`crate::data::roughness::mean_spacing`]).
    #[serde(rename = "Sm")]
    pub sm: f64,
    /// RMS of the unit-spacing gradient.
    pub rms_slope: f64,
    /// Deepest valley (minimum sample).
    #[serde(rename = "Rv")]
    pub rv: f64,
    /// Highest peak (maximum sample).
    #[serde(rename = "Rp")]
    pub rp: f64,
    /// Total height range `Rp - Rv`.
    #[serde(rename = "Rt")]
    pub rt: f64,
}

// ---------------------------------------------------------------------------
// DerivedSeries – the four diagnostic views
// ---------------------------------------------------------------------------

/// Sequences derived from a profile for plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSeries {
    /// Zero-phase low-pass (waviness) profile, same length as the input.
    pub filtered: Vec<f64>,
    /// Running sum of the profile.
    pub cumulative: Vec<f64>,
    /// Full autocorrelation divided by N, non-negative lags only.
    pub autocorrelation: Vec<f64>,
    /// Welch frequency axis (cycles per sample).
    pub frequencies: Vec<f64>,
    /// Welch power spectral density, one value per frequency.
    pub psd: Vec<f64>,
}

// ---------------------------------------------------------------------------
// AnalysisReport – what the boundary hands back
// ---------------------------------------------------------------------------

/// Metrics plus the base64 text of the rendered PNG figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub results: RoughnessMetrics,
    pub plot: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_serialise_with_customary_names() {
        let metrics = RoughnessMetrics {
            ra: 1.0,
            rq: 2.0,
            sm: 3.0,
            rms_slope: 4.0,
            rv: -1.0,
            rp: 1.0,
            rt: 2.0,
        };
        let json = serde_json::to_value(metrics).unwrap();
        let obj = json.as_object().unwrap();
        for key in ["Ra", "Rq", "Sm", "rms_slope", "Rv", "Rp", "Rt"] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert_eq!(obj.len(), 7);
        assert_eq!(json["rms_slope"], 4.0);
    }

    #[test]
    fn non_finite_metric_serialises_as_null() {
        let metrics = RoughnessMetrics {
            ra: 0.0,
            rq: 0.0,
            sm: f64::INFINITY,
            rms_slope: 0.0,
            rv: 0.0,
            rp: 0.0,
            rt: 0.0,
        };
        let json = serde_json::to_value(metrics).unwrap();
        assert!(json["Sm"].is_null());
    }

    #[test]
    fn profile_accessors() {
        let profile = Profile::from(vec![1.0, 2.0, 3.0]);
        assert_eq!(profile.len(), 3);
        assert!(!profile.is_empty());
        assert_eq!(profile.samples(), &[1.0, 2.0, 3.0]);
    }
}
