//! Error type shared by the conversion helpers.

use thiserror::Error;

/// Everything that can go wrong between invoking `sdds2stream` and
/// producing a table or a projected lattice.
#[derive(Debug, Error)]
pub enum Error {
    /// The external program could not be started at all.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external program ran but reported failure.
    #[error("{program} exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("tool output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("no data rows in tool output")]
    EmptyInput,

    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("column '{name}' has {got} values, table has {expected} rows")]
    LengthMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("cannot interpolate without samples")]
    NoSamples,

    #[error("invalid parameter value '{0}'")]
    InvalidParameter(String),

    #[error("settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
