use std::fmt;
use std::path::PathBuf;

/// The result type used in the entire dataset module.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors produced while acquiring or decoding the image dataset.
#[derive(Debug)]
pub enum DataError {
    /// A filesystem operation failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The HTTP transfer of a dataset file failed.
    Download { url: String, source: reqwest::Error },

    /// The server answered with a non-success status.
    HttpStatus { url: String, status: u16 },

    /// An IDX file does not start with the expected magic number.
    BadMagic {
        path: PathBuf,
        got: u32,
        expected: u32,
    },

    /// An IDX image file declares dimensions other than 28x28.
    BadImageShape { rows: usize, cols: usize },

    /// An IDX file is shorter than its header declares.
    Truncated { path: PathBuf },

    /// The image and label files disagree on the sample count.
    CountMismatch { images: usize, labels: usize },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Io { path, source } => {
                write!(f, "io error on {}: {source}", path.display())
            }
            DataError::Download { url, source } => write!(f, "download failed for {url}: {source}"),
            DataError::HttpStatus { url, status } => write!(f, "HTTP {status} for {url}"),
            DataError::BadMagic {
                path,
                got,
                expected,
            } => {
                write!(
                    f,
                    "bad IDX magic in {}: got {got:#010x}, expected {expected:#010x}",
                    path.display()
                )
            }
            DataError::BadImageShape { rows, cols } => {
                write!(f, "unexpected image shape {rows}x{cols}, expected 28x28")
            }
            DataError::Truncated { path } => {
                write!(f, "IDX file {} is truncated", path.display())
            }
            DataError::CountMismatch { images, labels } => {
                write!(f, "image/label count mismatch: {images} images, {labels} labels")
            }
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Io { source, .. } => Some(source),
            DataError::Download { source, .. } => Some(source),
            _ => None,
        }
    }
}
