//! # Widgets Module
//!
//! Canvas widgets drawn in tune-square coordinates.

pub mod lines_plot;
pub mod tunes_marker;
