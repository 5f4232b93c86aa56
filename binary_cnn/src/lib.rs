//! Fixed-topology binary classifier and its forward-only evaluator.

mod error;
mod eval;
mod model;
pub mod ops;

pub use error::{CnnError, Result};
pub use eval::{Metrics, evaluate, sigmoid};
pub use model::{BinaryCnn, Device, IMG_SIDE};
