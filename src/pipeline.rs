use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::data::loader::load_profile_bytes;
use crate::data::model::{AnalysisReport, Profile, RoughnessMetrics};
use crate::data::{derive_series, roughness};
use crate::error::Result;
use crate::render::render_figure;

// ---------------------------------------------------------------------------
// One profile in, metrics + figure out
// ---------------------------------------------------------------------------

/// Metrics and PNG bytes for one profile.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub metrics: RoughnessMetrics,
    pub png: Vec<u8>,
}

impl Analysis {
    /// Transport form: the PNG as base64 text.
    pub fn into_report(self) -> AnalysisReport {
        AnalysisReport {
            results: self.metrics,
            plot: STANDARD.encode(&self.png),
        }
    }
}

/// Compute metrics, then the figure.  Either failure aborts the whole call.
pub fn analyze_profile(profile: &Profile) -> Result<Analysis> {
    let metrics = roughness::calculate_parameters(profile)?;
    let series = derive_series(profile)?;
    let png = render_figure(profile, &series)?;

    log::info!(
        "Analysed {} samples: Ra={:.4} Rq={:.4} Rt={:.4}",
        profile.len(),
        metrics.ra,
        metrics.rq,
        metrics.rt
    );
    Ok(Analysis { metrics, png })
}

/// Load an uploaded table and analyse it.
pub fn analyze_bytes(bytes: &[u8]) -> Result<AnalysisReport> {
    let profile = load_profile_bytes(bytes)?;
    Ok(analyze_profile(&profile)?.into_report())
}
