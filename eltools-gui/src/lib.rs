//! # eltools GUI widgets
//!
//! Paint-backend counterparts of the web charts: Iced canvas programs that
//! draw the resonance diagram and the tune marker. Geometry comes from
//! `eltools-core`; this crate only maps it onto the canvas.
//!
//! There is no application here. Embed the widgets with their `view()`
//! methods in an Iced layout.

pub mod transform;
pub mod widgets;

pub use transform::UnitSquare;
pub use widgets::lines_plot::LinesPlot;
pub use widgets::tunes_marker::TunesMarker;
