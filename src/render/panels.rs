use std::ops::Range;

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::color::SeriesColors;

// ---------------------------------------------------------------------------
// Panel titles and labels
// ---------------------------------------------------------------------------

pub const WAVINESS_TITLE: &str = "P - Waviness (Filter Profile)";
pub const CUMULATIVE_TITLE: &str = "Cumulative Profile";
pub const AUTOCORRELATION_TITLE: &str = "W - Auto-correlation Function";
pub const PSD_TITLE: &str = "R - Power Spectral Density";

const PSD_X_LABEL: &str = "Frequency [Hz]";
const PSD_Y_LABEL: &str = "PSD [V**2/Hz]";

const TITLE_FONT: (&str, u32) = ("sans-serif", 18);
const LABEL_FONT: (&str, u32) = ("sans-serif", 12);

// ---------------------------------------------------------------------------
// Individual subplots
// ---------------------------------------------------------------------------

/// Raw profile overlaid with its waviness component, with a legend.
pub fn waviness_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    profile: &[f64],
    waviness: &[f64],
    colors: &SeriesColors,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let y_range = value_range(profile.iter().chain(waviness).copied());
    let mut chart = ChartBuilder::on(area)
        .caption(WAVINESS_TITLE, TITLE_FONT)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(55)
        .build_cartesian_2d(index_range(profile.len()), y_range)?;

    chart
        .configure_mesh()
        .label_style(LABEL_FONT)
        .light_line_style(&TRANSPARENT)
        .draw()?;

    let profile_color = colors.profile;
    chart
        .draw_series(LineSeries::new(indexed(profile), profile_color.stroke_width(1)))?
        .label("Original Profile")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], profile_color));

    let waviness_color = colors.waviness;
    chart
        .draw_series(LineSeries::new(indexed(waviness), waviness_color.stroke_width(2)))?
        .label("Waviness Profile")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], waviness_color));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.4))
        .label_font(LABEL_FONT)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    Ok(())
}

/// A single sequence plotted against its index.
pub fn sequence_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    values: &[f64],
    color: RGBColor,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut chart = ChartBuilder::on(area)
        .caption(title, TITLE_FONT)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(55)
        .build_cartesian_2d(index_range(values.len()), value_range(values.iter().copied()))?;

    chart
        .configure_mesh()
        .label_style(LABEL_FONT)
        .light_line_style(&TRANSPARENT)
        .draw()?;

    chart.draw_series(LineSeries::new(indexed(values), color.stroke_width(1)))?;
    Ok(())
}

/// Power spectral density on a logarithmic y-axis.  Non-positive densities
/// have no logarithm and are left out of the line.
pub fn psd_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    frequencies: &[f64],
    psd: &[f64],
    color: RGBColor,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let points: Vec<(f64, f64)> = frequencies
        .iter()
        .copied()
        .zip(psd.iter().copied())
        .filter(|(_, p)| p.is_finite() && *p > 0.0)
        .collect();

    let x_range = value_range(frequencies.iter().copied());
    let y_range = log_range(points.iter().map(|(_, p)| *p));

    let mut chart = ChartBuilder::on(area)
        .caption(PSD_TITLE, TITLE_FONT)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(65)
        .build_cartesian_2d(x_range, y_range.log_scale())?;

    chart
        .configure_mesh()
        .label_style(LABEL_FONT)
        .light_line_style(&TRANSPARENT)
        .x_desc(PSD_X_LABEL)
        .y_desc(PSD_Y_LABEL)
        .y_label_formatter(&|v| format!("{v:.0e}"))
        .draw()?;

    chart.draw_series(LineSeries::new(points, color.stroke_width(1)))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

fn indexed(values: &[f64]) -> impl Iterator<Item = (f64, f64)> + '_ {
    values.iter().enumerate().map(|(i, &v)| (i as f64, v))
}

fn index_range(len: usize) -> Range<f64> {
    0.0..(len.saturating_sub(1).max(1)) as f64
}

/// Data bounds of the finite values with a 5 % margin.
fn value_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return -1.0..1.0;
    }
    let span = hi - lo;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        lo.abs().max(1.0) * 0.05
    };
    (lo - pad)..(hi + pad)
}

/// Positive bounds for a logarithmic axis, widened by a factor of two.
fn log_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return 1e-12..1.0;
    }
    if lo == hi {
        return (lo / 10.0)..(hi * 10.0);
    }
    (lo / 2.0)..(hi * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_range_pads_data_bounds() {
        let range = value_range([0.0, 10.0, f64::NAN]);
        assert!(range.start < 0.0 && range.start > -1.0);
        assert!(range.end > 10.0 && range.end < 11.0);
    }

    #[test]
    fn flat_data_gets_a_non_empty_range() {
        let range = value_range([5.0, 5.0]);
        assert!(range.start < 5.0 && range.end > 5.0);
        let range = value_range(std::iter::empty());
        assert_eq!(range, -1.0..1.0);
    }

    #[test]
    fn log_range_stays_positive() {
        let range = log_range([1e-6, 1e-2]);
        assert!(range.start > 0.0);
        assert!(range.end > 1e-2);
        assert_eq!(log_range(std::iter::empty()), 1e-12..1.0);
    }

    #[test]
    fn index_range_covers_all_samples() {
        assert_eq!(index_range(100), 0.0..99.0);
        assert_eq!(index_range(1), 0.0..1.0);
    }
}
