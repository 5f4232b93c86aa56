use std::path::Path;

use log::debug;
use ndarray::{Array1, Array2, Array4};

use crate::hex::load_mem_ints;
use crate::{Result, WeightsError};

/// Convolution kernel dump, one 8-bit value per tap.
pub const CONV_W_FILE: &str = "conv_w.mem";
/// Convolution bias dump, one 32-bit value per output channel.
pub const CONV_B_FILE: &str = "conv_b.mem";
/// Fully-connected weight dump, one 8-bit value per input.
pub const FC_W_FILE: &str = "fc_w.mem";
/// Fully-connected bias dump, a single 32-bit value.
pub const FC_B_FILE: &str = "fc_b.mem";

/// Output channels of the convolution.
pub const CONV_CHANNELS: usize = 16;
/// Side of the square convolution kernel.
pub const KERNEL_SIZE: usize = 3;
/// Side of the pooled feature map (28 -> 26 after the valid conv, 26 -> 13 after 2x2 pooling).
pub const POOLED_SIDE: usize = 13;
/// Inputs of the fully-connected projection, the pooled map flattened.
pub const FC_IN: usize = CONV_CHANNELS * POOLED_SIDE * POOLED_SIDE;

// Heuristic fixed-point scales matching the hardware simulation that produced
// the dumps. Treated as constants of the dump format, never inferred.
const W8_SCALE: f32 = 128.0;
const CONV_B_SCALE: f32 = 4096.0;
const FC_B_SCALE: f32 = 32768.0;

/// The full parameter set of the binary classifier, rescaled to `f32`.
///
/// Built once from the four `.mem` dumps and immutable afterwards.
#[derive(Debug, Clone)]
pub struct WeightSet {
    /// Convolution kernel, [out-channel, in-channel, kernel-row, kernel-col].
    pub conv_w: Array4<f32>,
    /// Per-output-channel convolution bias.
    pub conv_b: Array1<f32>,
    /// Fully-connected weights, [output, input].
    pub fc_w: Array2<f32>,
    /// Fully-connected bias, a single element.
    pub fc_b: Array1<f32>,
}

impl WeightSet {
    /// Builds the weight set from the four parsed integer sequences.
    ///
    /// Every sequence is divided by its fixed-point scale and reshaped
    /// row-major. A sequence of the wrong length is a hard error, never
    /// truncated or padded.
    ///
    /// # Arguments
    /// * `conv_w` - 144 kernel taps in [out-channel, in-channel, row, col] order.
    /// * `conv_b` - 16 convolution biases.
    /// * `fc_w` - 2704 fully-connected weights in [channel, row, col] flatten order.
    /// * `fc_b` - The single fully-connected bias.
    ///
    /// # Returns
    /// The rescaled weight set or a shape mismatch error.
    pub fn build(
        conv_w: &[i64],
        conv_b: &[i64],
        fc_w: &[i64],
        fc_b: &[i64],
    ) -> Result<Self> {
        let conv_w_len = CONV_CHANNELS * KERNEL_SIZE * KERNEL_SIZE;
        check_len("conv weights", conv_w.len(), conv_w_len)?;
        check_len("conv biases", conv_b.len(), CONV_CHANNELS)?;
        check_len("fc weights", fc_w.len(), FC_IN)?;
        check_len("fc bias", fc_b.len(), 1)?;

        let conv_w = Array4::from_shape_vec(
            (CONV_CHANNELS, 1, KERNEL_SIZE, KERNEL_SIZE),
            scale(conv_w, W8_SCALE),
        )
        .expect("length checked above");
        let conv_b = Array1::from_vec(scale(conv_b, CONV_B_SCALE));
        let fc_w = Array2::from_shape_vec((1, FC_IN), scale(fc_w, W8_SCALE))
            .expect("length checked above");
        let fc_b = Array1::from_vec(scale(fc_b, FC_B_SCALE));

        Ok(Self {
            conv_w,
            conv_b,
            fc_w,
            fc_b,
        })
    }

    /// Loads and builds the weight set from a directory of `.mem` dumps.
    ///
    /// All four files are checked for existence before any parsing begins, so
    /// a missing file is reported without a partial parse.
    ///
    /// # Arguments
    /// * `mem_dir` - Directory containing `conv_w.mem`, `conv_b.mem`,
    ///   `fc_w.mem` and `fc_b.mem`.
    pub fn load(mem_dir: &Path) -> Result<Self> {
        let conv_w_path = mem_dir.join(CONV_W_FILE);
        let conv_b_path = mem_dir.join(CONV_B_FILE);
        let fc_w_path = mem_dir.join(FC_W_FILE);
        let fc_b_path = mem_dir.join(FC_B_FILE);

        for path in [&conv_w_path, &conv_b_path, &fc_w_path, &fc_b_path] {
            if !path.exists() {
                return Err(WeightsError::MissingFile { path: path.clone() });
            }
        }

        let conv_w = load_mem_ints(&conv_w_path, 8)?;
        let conv_b = load_mem_ints(&conv_b_path, 32)?;
        let fc_w = load_mem_ints(&fc_w_path, 8)?;
        let fc_b = load_mem_ints(&fc_b_path, 32)?;
        debug!(
            "parsed mem dumps from {}: {}+{}+{}+{} values",
            mem_dir.display(),
            conv_w.len(),
            conv_b.len(),
            fc_w.len(),
            fc_b.len()
        );

        Self::build(&conv_w, &conv_b, &fc_w, &fc_b)
    }
}

fn check_len(what: &'static str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(WeightsError::ShapeMismatch {
            what,
            got,
            expected,
        });
    }
    Ok(())
}

fn scale(vals: &[i64], divisor: f32) -> Vec<f32> {
    vals.iter().map(|&v| v as f32 / divisor).collect()
}
