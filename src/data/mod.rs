/// Data layer: profile loading, roughness statistics and signal views.
///
/// Architecture:
/// ```text
///  uploaded .csv / .txt bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse first column → Profile
///   └──────────┘
///        │
///        ├──────────────────────┐
///        ▼                      ▼
///   ┌───────────┐        ┌─────────────────────┐
///   │ roughness │        │ filter + spectral   │
///   └───────────┘        └─────────────────────┘
///   RoughnessMetrics      DerivedSeries (waviness, cumulative,
///                         autocorrelation, PSD)
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod roughness;
pub mod spectral;

use crate::error::Result;

use model::{DerivedSeries, Profile};

/// Compute the four plotted views of a profile.
pub fn derive_series(profile: &Profile) -> Result<DerivedSeries> {
    let samples = profile.samples();

    let filtered = filter::waviness(samples)?;
    let cumulative = spectral::cumulative_sum(samples);
    let autocorrelation = spectral::autocorrelation_view(samples)?;
    let spectrum = spectral::welch(samples, spectral::WELCH_SEGMENT_LEN)?;

    Ok(DerivedSeries {
        filtered,
        cumulative,
        autocorrelation,
        frequencies: spectrum.frequencies,
        psd: spectrum.psd,
    })
}
