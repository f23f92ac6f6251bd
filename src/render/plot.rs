use std::io::Cursor;
use std::panic;

use image::{ImageFormat, RgbImage};
use plotters::prelude::*;

use crate::color::SeriesColors;
use crate::data::model::{DerivedSeries, Profile};
use crate::error::{ProfileError, Result};

use super::backend::FontSafeBackend;
use super::panels::{self, AUTOCORRELATION_TITLE, CUMULATIVE_TITLE};

// ---------------------------------------------------------------------------
// Composite figure (2 x 2 grid)
// ---------------------------------------------------------------------------

/// Figure size in pixels (10 x 8 inches at 100 dpi).
pub const FIGURE_SIZE: (u32, u32) = (1000, 800);

/// Render the four diagnostic views of `profile` into one PNG.
///
/// The pixel buffer lives only for the duration of the call.  A panic inside
/// the drawing backend is reported as a render error instead of unwinding
/// into the caller.
pub fn render_figure(profile: &Profile, series: &DerivedSeries) -> Result<Vec<u8>> {
    let colors = SeriesColors::default();
    let outcome = panic::catch_unwind(panic::AssertUnwindSafe(|| {
        draw_png(profile, series, &colors)
    }));
    match outcome {
        Ok(result) => result,
        Err(_) => Err(ProfileError::render("plotting backend panicked")),
    }
}

fn draw_png(profile: &Profile, series: &DerivedSeries, colors: &SeriesColors) -> Result<Vec<u8>> {
    let (width, height) = FIGURE_SIZE;
    let mut pixels = vec![0u8; width as usize * height as usize * 3];

    {
        let backend = BitMapBackend::with_buffer(&mut pixels, FIGURE_SIZE);
        let root = FontSafeBackend::new(backend).into_drawing_area();
        draw_grid(&root, profile, series, colors)
            .map_err(|e| ProfileError::render(format!("drawing figure: {e:#}")))?;
        root.present()
            .map_err(|e| ProfileError::render(format!("finishing figure: {e}")))?;
    }

    encode_png(pixels, width, height)
}

fn draw_grid<DB>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    profile: &Profile,
    series: &DerivedSeries,
    colors: &SeriesColors,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let areas = root.split_evenly((2, 2));

    panels::waviness_panel(&areas[0], profile.samples(), &series.filtered, colors)?;
    panels::sequence_panel(&areas[1], CUMULATIVE_TITLE, &series.cumulative, colors.cumulative)?;
    panels::sequence_panel(
        &areas[2],
        AUTOCORRELATION_TITLE,
        &series.autocorrelation,
        colors.autocorrelation,
    )?;
    panels::psd_panel(&areas[3], &series.frequencies, &series.psd, colors.psd)?;
    Ok(())
}

fn encode_png(pixels: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    let image = RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| ProfileError::render("pixel buffer does not match figure size"))?;

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| ProfileError::render(format!("encoding PNG: {e}")))?;
    Ok(png)
}
