//! Surface roughness analysis of one-dimensional height profiles.
//!
//! A profile table is loaded ([`data::loader`]), reduced to the standard
//! roughness statistics ([`data::roughness`]) and turned into four diagnostic
//! views ([`data::derive_series`]) that are drawn into a single PNG
//! ([`render`]).  [`pipeline`] ties the stages together and [`app`] serves
//! them over HTTP.

pub mod app;
pub mod color;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod state;

pub use error::{ProfileError, Result};
