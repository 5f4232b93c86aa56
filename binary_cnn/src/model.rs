use std::fmt;

use mem_weights::WeightSet;
use ndarray::{Array1, ArrayView4, Axis};

use crate::ops;
use crate::{CnnError, Result};

/// Side of the square input images.
pub const IMG_SIDE: usize = 28;

/// The numeric backend the forward pass runs on.
///
/// Only the CPU backend exists; the device is carried as plain configuration
/// rather than polymorphism in the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Device {
    #[default]
    Cpu,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
        }
    }
}

/// The two-layer convolutional binary classifier.
///
/// Topology is fixed: valid 3x3 convolution to 16 channels, ReLU, 2x2 max
/// pooling, flatten, fully-connected projection to a single logit. The weight
/// set is owned for the lifetime of the run and never mutated.
pub struct BinaryCnn {
    weights: WeightSet,
    device: Device,
}

impl BinaryCnn {
    /// Creates a classifier around an already-built weight set.
    pub fn new(weights: WeightSet, device: Device) -> Self {
        Self { weights, device }
    }

    /// Returns the backend this classifier runs on.
    pub fn device(&self) -> Device {
        self.device
    }

    /// Runs the forward pass over a batch of images.
    ///
    /// No sigmoid is applied; thresholding of the returned logits is the
    /// evaluator's job.
    ///
    /// # Arguments
    /// * `x` - Image batch, [batch, 1, 28, 28], pixel values in [0, 1].
    ///
    /// # Returns
    /// One logit per sample, the unnormalized log-odds of class 1.
    pub fn forward(&self, x: ArrayView4<f32>) -> Result<Array1<f32>> {
        let (_, c, h, w) = x.dim();
        if c != 1 {
            return Err(CnnError::ShapeMismatch {
                what: "image channels",
                got: c,
                expected: 1,
            });
        }
        if h != IMG_SIDE || w != IMG_SIDE {
            return Err(CnnError::ShapeMismatch {
                what: "image side",
                got: if h != IMG_SIDE { h } else { w },
                expected: IMG_SIDE,
            });
        }

        let mut a = ops::conv2d_valid(x, self.weights.conv_w.view(), self.weights.conv_b.view())?;
        ops::relu_inplace(&mut a);
        let pooled = ops::max_pool2x2(a.view());
        let flat = ops::flatten_batch(pooled.view());
        let logits = ops::linear(flat.view(), self.weights.fc_w.view(), self.weights.fc_b.view())?;

        Ok(logits.index_axis_move(Axis(1), 0))
    }
}
