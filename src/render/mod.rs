//! Headless rendering of the diagnostic figure.

pub mod backend;
pub mod panels;
pub mod plot;

pub use plot::{render_figure, FIGURE_SIZE};
