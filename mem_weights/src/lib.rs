//! Reconstruction of fixed-point CNN weights from Verilog-style `.mem` dumps.

mod error;
mod hex;
mod weights;

pub use error::{Result, WeightsError};
pub use hex::{load_mem_ints, parse_hex_signed};
pub use weights::{
    CONV_B_FILE, CONV_CHANNELS, CONV_W_FILE, FC_B_FILE, FC_IN, FC_W_FILE, KERNEL_SIZE,
    POOLED_SIDE, WeightSet,
};
