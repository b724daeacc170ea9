//! # Settings Module
//!
//! Paths and constants that the scripts otherwise hard-code, stored as a
//! small JSON file so a project can point the tools at its own result
//! directory or at a non-standard `sdds2stream` build.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::charts::RESONANCE_COLOR;
use crate::error::Result;
use crate::lattice::DEFAULT_ELEMENT_WIDTH;
use crate::sdds::{
    Converter, Sdds2Stream, DEFAULT_MAG_FILE, DEFAULT_PROGRAM, DEFAULT_TWISS_FILE,
    DEFAULT_XYZ_FILE,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Program used to stream SDDS files.
    pub program: String,
    pub mag_file: PathBuf,
    pub twiss_file: PathBuf,
    pub xyz_file: PathBuf,
    /// Sideways extent of a full-strength element in the lattice view, in metres.
    pub element_width: f64,
    pub resonance_order: u32,
    pub resonance_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            mag_file: PathBuf::from(DEFAULT_MAG_FILE),
            twiss_file: PathBuf::from(DEFAULT_TWISS_FILE),
            xyz_file: PathBuf::from(DEFAULT_XYZ_FILE),
            element_width: DEFAULT_ELEMENT_WIDTH,
            resonance_order: 3,
            resonance_color: RESONANCE_COLOR.to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut data = String::new();
        file.read_to_string(&mut data)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Saves the settings as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json_string = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json_string.as_bytes())?;
        Ok(())
    }

    /// A converter calling the configured program.
    pub fn converter(&self) -> Converter<Sdds2Stream> {
        Converter::new(Sdds2Stream::new(self.program.clone())).with_element_width(self.element_width)
    }
}
