// eltools-core/src/lib.rs

//! Helpers for plotting accelerator simulation output.
//! This crate reads SDDS result files through `sdds2stream`, reshapes
//! them into tables, computes the geometric overlays (lattice top view,
//! resonance lines, tune markers) and builds web chart objects. It is
//! completely headless and contains no GUI code.

pub mod charts;
pub mod config;
pub mod error;
pub mod interp;
pub mod lattice;
pub mod resonance;
pub mod sdds;
pub mod table;
pub mod tunes;

pub use error::{Error, Result};
pub use resonance::{ResonanceLine, Segment};
pub use sdds::{CommandRunner, Converter, Sdds2Stream};
pub use table::Table;
