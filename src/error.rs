use std::path::PathBuf;
use std::{fmt, io};

#[derive(Debug)]
pub enum Error {
    /// A unit was activated with an input vector of the wrong length.
    InvalidInputSize { expected: usize, got: usize },
    /// An input or target vector disagrees with the network topology.
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    /// A model file could not be opened, or is truncated or malformed.
    ModelLoad(String),
    /// A model file could not be written.
    ModelSave { path: PathBuf, source: io::Error },
    InvalidConfig(String),
    InvalidData(String),
    Io(io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInputSize { expected, got } => {
                write!(f, "invalid input size: expected {expected}, got {got}")
            }
            Error::DimensionMismatch {
                what,
                expected,
                got,
            } => write!(
                f,
                "dimension mismatch: {what} len {got} does not match expected {expected}"
            ),
            Error::ModelLoad(msg) => write!(f, "failed to load model: {msg}"),
            Error::ModelSave { path, source } => {
                write!(f, "failed to save model to {}: {source}", path.display())
            }
            Error::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Error::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            Error::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ModelSave { source, .. } => Some(source),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
