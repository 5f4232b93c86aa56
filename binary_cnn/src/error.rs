use std::fmt;

/// The result type used in the entire classifier module.
pub type Result<T> = std::result::Result<T, CnnError>;

/// Errors produced by the classifier when inputs are invalid.
#[derive(Debug)]
pub enum CnnError {
    /// A shape invariant was violated (e.g. wrong input dimensions).
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
}

impl fmt::Display for CnnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CnnError::ShapeMismatch {
                what,
                got,
                expected,
            } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
        }
    }
}

impl std::error::Error for CnnError {}
