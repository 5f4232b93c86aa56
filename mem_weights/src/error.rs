use std::fmt;
use std::path::PathBuf;

/// The result type used in the entire weight loading module.
pub type Result<T> = std::result::Result<T, WeightsError>;

/// Errors produced while reconstructing weights from `.mem` dumps.
#[derive(Debug)]
pub enum WeightsError {
    /// A required `.mem` file is absent from the memory directory.
    MissingFile { path: PathBuf },

    /// A non-comment line could not be decoded as fixed-width two's-complement hex.
    Parse { path: PathBuf, line: String },

    /// A parsed sequence does not have the length required by the architecture.
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    /// The file exists but could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for WeightsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightsError::MissingFile { path } => {
                write!(f, "Missing file: {}", path.display())
            }
            WeightsError::Parse { path, line } => {
                write!(
                    f,
                    "invalid hex token {line:?} in {}",
                    path.display()
                )
            }
            WeightsError::ShapeMismatch {
                what,
                got,
                expected,
            } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
            WeightsError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for WeightsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WeightsError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
