//! # SDDS Conversion Module
//!
//! Reads SDDS result files by shelling out to `sdds2stream` and parsing
//! what it prints. The call is blocking, with no timeout or retry.
//!
//! The `Converter` methods are the public boundary: failures are logged
//! and turned into `None`. The `try_*` variants return the underlying
//! error for callers that want it.

use std::path::Path;
use std::process::Command;

use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::lattice::{self, DEFAULT_ELEMENT_WIDTH};
use crate::table::Table;

/// Default program name of the SDDS streaming tool.
pub const DEFAULT_PROGRAM: &str = "sdds2stream";
/// Magnet profile file written by elegant's `&magnets` output.
pub const DEFAULT_MAG_FILE: &str = "results/beamline.mag";
pub const DEFAULT_TWISS_FILE: &str = "results/twiss.twi";
pub const DEFAULT_XYZ_FILE: &str = "results/xyz.sdds";

/// Columns of the floor coordinate file used by the lattice view.
pub const XYZ_COLUMNS: [&str; 6] = ["ElementName", "s", "X", "Y", "Z", "theta"];
/// Columns of the magnet profile file.
pub const MAG_COLUMNS: [&str; 3] = ["ElementName", "s", "Profile"];

/// Builds the column-selection flag, e.g. `-col=ElementName,s,Profile`.
pub fn column_argument<S: AsRef<str>>(names: &[S]) -> String {
    let joined = names
        .iter()
        .map(|n| n.as_ref())
        .collect::<Vec<_>>()
        .join(",");
    format!("-col={joined}")
}

pub fn parameter_argument(name: &str) -> String {
    format!("-par={name}")
}

/// Runs the external tool and hands back its standard output.
pub trait CommandRunner {
    fn run(&self, args: &[String]) -> Result<String>;
}

/// The real `sdds2stream` executable.
#[derive(Debug, Clone)]
pub struct Sdds2Stream {
    program: String,
}

impl Sdds2Stream {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Sdds2Stream {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl CommandRunner for Sdds2Stream {
    fn run(&self, args: &[String]) -> Result<String> {
        debug!("[SDDS] running {} {}", self.program, args.join(" "));
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| Error::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::ToolFailed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8(output.stdout)?)
    }
}

/// Converts SDDS files into tables and derived geometry.
#[derive(Debug, Clone)]
pub struct Converter<R = Sdds2Stream> {
    runner: R,
    element_width: f64,
}

impl Default for Converter<Sdds2Stream> {
    fn default() -> Self {
        Self::new(Sdds2Stream::default())
    }
}

impl<R: CommandRunner> Converter<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            element_width: DEFAULT_ELEMENT_WIDTH,
        }
    }

    /// Sets the drawn half-width of a full-strength element, in metres.
    pub fn with_element_width(mut self, width: f64) -> Self {
        self.element_width = width;
        self
    }

    pub fn element_width(&self) -> f64 {
        self.element_width
    }

    pub fn try_sdds_to_table<S: AsRef<str>>(&self, file: &Path, names: &[S]) -> Result<Table> {
        let args = vec![
            file.display().to_string(),
            column_argument(names),
            "-pipe=out".to_string(),
        ];
        let stdout = self.runner.run(&args)?;
        Table::parse(&stdout, names)
    }

    /// Reads the named columns of `file`; `None` if anything fails.
    pub fn sdds_to_table<S: AsRef<str>>(&self, file: &Path, names: &[S]) -> Option<Table> {
        self.try_sdds_to_table(file, names)
            .map_err(|e| error!("[SDDS] reading {}: {e}", file.display()))
            .ok()
    }

    pub fn try_sdds_parameter(&self, file: &Path, par: &str) -> Result<f64> {
        let args = vec![
            file.display().to_string(),
            parameter_argument(par),
            "-pipe=out".to_string(),
        ];
        let stdout = self.runner.run(&args)?;
        let token = stdout.trim();
        token
            .parse::<f64>()
            .map_err(|_| Error::InvalidParameter(token.to_string()))
    }

    /// Reads a single numeric parameter such as `nux` from a twiss file.
    pub fn sdds_parameter(&self, file: &Path, par: &str) -> Option<f64> {
        self.try_sdds_parameter(file, par)
            .map_err(|e| error!("[SDDS] parameter {par} of {}: {e}", file.display()))
            .ok()
    }

    /// Reads the horizontal and vertical tunes (`nux`, `nuy`).
    pub fn tunes(&self, file: &Path) -> Option<(f64, f64)> {
        Some((
            self.sdds_parameter(file, "nux")?,
            self.sdds_parameter(file, "nuy")?,
        ))
    }

    pub fn try_acc_view(&self, xyz_file: &Path, mag_file: &Path) -> Result<Table> {
        let xyz = self.try_sdds_to_table(xyz_file, &XYZ_COLUMNS)?;
        let profile = self.try_sdds_to_table(mag_file, &MAG_COLUMNS)?;
        lattice::project_profile(&xyz, profile, self.element_width)
    }

    /// Builds the top view of the machine: the magnet profile projected
    /// onto the floor coordinates, as columns `X` and `Z`.
    pub fn acc_view(&self, xyz_file: &Path, mag_file: &Path) -> Option<Table> {
        self.try_acc_view(xyz_file, mag_file)
            .map_err(|e| error!("[LATTICE] building lattice view: {e}"))
            .ok()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Replies with canned output keyed by the file argument.
    #[derive(Default)]
    pub(crate) struct FakeRunner {
        pub replies: HashMap<String, String>,
        pub calls: RefCell<Vec<Vec<String>>>,
    }

    impl FakeRunner {
        pub fn with(mut self, key: &str, reply: &str) -> Self {
            self.replies.insert(key.to_string(), reply.to_string());
            self
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, args: &[String]) -> Result<String> {
            self.calls.borrow_mut().push(args.to_vec());
            let key = format!("{} {}", args[0], args[1]);
            self.replies
                .get(&key)
                .cloned()
                .ok_or_else(|| Error::InvalidParameter(key))
        }
    }

    #[test]
    fn builds_tool_arguments() {
        assert_eq!(
            column_argument(&["ElementName", "s", "Profile"]),
            "-col=ElementName,s,Profile"
        );
        assert_eq!(column_argument(&["s"]), "-col=s");
        assert_eq!(parameter_argument("nux"), "-par=nux");
    }

    #[test]
    fn passes_file_flag_and_pipe() {
        let runner = FakeRunner::default().with("lat.twi -col=s,betax", "0 10\n1 12\n");
        let converter = Converter::new(runner);
        let table = converter
            .sdds_to_table(Path::new("lat.twi"), &["s", "betax"])
            .unwrap();
        assert_eq!(table.numeric("betax").unwrap(), &[10.0, 12.0]);
        assert_eq!(
            converter.runner.calls.borrow()[0],
            vec!["lat.twi", "-col=s,betax", "-pipe=out"]
        );
    }

    #[test]
    fn failures_become_none() {
        let converter = Converter::new(FakeRunner::default().with("bad -col=s", "abc def\n"));
        assert!(converter.sdds_to_table(Path::new("missing"), &["s"]).is_none());
        // Two fields for one named column.
        assert!(converter.sdds_to_table(Path::new("bad"), &["s"]).is_none());
    }

    #[test]
    fn reads_parameters() {
        let runner = FakeRunner::default()
            .with("t.twi -par=nux", "  8.2345\n")
            .with("t.twi -par=nuy", "3.71\n")
            .with("u.twi -par=nux", "n/a\n");
        let converter = Converter::new(runner);
        assert_eq!(
            converter.tunes(Path::new("t.twi")),
            Some((8.2345, 3.71))
        );
        assert!(matches!(
            converter.try_sdds_parameter(Path::new("u.twi"), "nux"),
            Err(Error::InvalidParameter(_))
        ));
        assert!(converter.tunes(Path::new("u.twi")).is_none());
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let runner = Sdds2Stream::new("eltools-no-such-program");
        match runner.run(&["x".to_string()]) {
            Err(Error::Spawn { program, .. }) => assert_eq!(program, "eltools-no-such-program"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_reports_trimmed_stderr() {
        let runner = Sdds2Stream::new("sh");
        let args = ["-c".to_string(), "echo '  no such column  ' >&2; exit 3".to_string()];
        match runner.run(&args) {
            Err(Error::ToolFailed {
                program,
                status,
                stderr,
            }) => {
                assert_eq!(program, "sh");
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "no such column");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
