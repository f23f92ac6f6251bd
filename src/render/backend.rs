use std::panic;

use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
};

// ---------------------------------------------------------------------------
// Font-tolerant drawing backend
// ---------------------------------------------------------------------------

/// Wraps a backend so that a missing or broken system font never aborts a
/// figure: text that cannot be laid out is skipped and its size is estimated
/// from the requested font size.  Skipped labels are counted and reported
/// once when the figure is presented.
///
/// Lines, rectangles and paths are forwarded; the remaining primitives use
/// the pixel-level defaults of [`DrawingBackend`].
pub struct FontSafeBackend<DB> {
    inner: DB,
    skipped_labels: usize,
}

impl<DB> FontSafeBackend<DB> {
    pub fn new(inner: DB) -> Self {
        Self {
            inner,
            skipped_labels: 0,
        }
    }

    /// Labels dropped so far because no font could render them.
    pub fn skipped_labels(&self) -> usize {
        self.skipped_labels
    }
}

impl<DB: DrawingBackend> DrawingBackend for FontSafeBackend<DB> {
    type ErrorType = DB::ErrorType;

    fn get_size(&self) -> (u32, u32) {
        self.inner.get_size()
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.ensure_prepared()
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        if self.skipped_labels > 0 {
            log::warn!(
                "{} figure labels skipped: no usable font",
                self.skipped_labels
            );
        }
        self.inner.present()
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_pixel(point, color)
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_line(from, to, style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_rect(upper_left, bottom_right, style, fill)
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_path(path, style)
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        let drawn = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            self.inner.draw_text(text, style, pos)
        }));
        match drawn {
            Ok(Err(DrawingErrorKind::FontError(err))) => {
                log::debug!("skipping label {text:?}: {err}");
                self.skipped_labels += 1;
                Ok(())
            }
            Ok(result) => result,
            Err(_) => {
                log::debug!("font backend panicked while drawing {text:?}");
                self.skipped_labels += 1;
                Ok(())
            }
        }
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        let estimated = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            self.inner.estimate_text_size(text, style)
        }));
        match estimated {
            Ok(Ok(size)) => Ok(size),
            Ok(Err(DrawingErrorKind::DrawingError(err))) => {
                Err(DrawingErrorKind::DrawingError(err))
            }
            _ => Ok(approximate_text_size(text, style.size())),
        }
    }
}

/// Box of a line of text in a generic sans-serif face.
fn approximate_text_size(text: &str, font_size: f64) -> (u32, u32) {
    let width = text.chars().count() as f64 * font_size * 0.6;
    (width.ceil() as u32, font_size.ceil() as u32)
}
