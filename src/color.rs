use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    (0..n).map(|i| palette_color(i, n)).collect()
}

/// The `i`-th of `n` evenly spaced hues, starting from blue.
fn palette_color(i: usize, n: usize) -> RGBColor {
    let hue = 210.0 + (i as f32 / n as f32) * 360.0;
    let rgb: Srgb = Hsl::new(hue, 0.75, 0.45).into_color();
    RGBColor(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Series colours for the figure
// ---------------------------------------------------------------------------

/// Colours used by the diagnostic figure: one per line series.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    pub profile: RGBColor,
    pub waviness: RGBColor,
    pub cumulative: RGBColor,
    pub autocorrelation: RGBColor,
    pub psd: RGBColor,
}

impl Default for SeriesColors {
    fn default() -> Self {
        const SERIES: usize = 5;
        SeriesColors {
            profile: palette_color(0, SERIES),
            waviness: palette_color(1, SERIES),
            cumulative: palette_color(2, SERIES),
            autocorrelation: palette_color(3, SERIES),
            psd: palette_color(4, SERIES),
        }
    }
}
