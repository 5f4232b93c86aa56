use log::debug;
use ndarray::ArrayView4;

use crate::model::BinaryCnn;
use crate::{CnnError, Result};

/// The logistic function, mapping a logit to the probability of class 1.
pub fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}

/// Confusion-matrix accumulator for the binary evaluation, with label 1 as
/// "positive". Monotonically updated across batches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    total: usize,
    correct: usize,
    pos: usize,
    neg: usize,
    true_pos: usize,
    true_neg: usize,
    false_pos: usize,
    false_neg: usize,
}

impl Metrics {
    /// Records one prediction against its true label.
    pub fn record(&mut self, pred: u8, label: u8) {
        debug_assert!(pred <= 1 && label <= 1);

        self.total += 1;
        if pred == label {
            self.correct += 1;
        }
        match (label, pred) {
            (1, 1) => {
                self.pos += 1;
                self.true_pos += 1;
            }
            (1, _) => {
                self.pos += 1;
                self.false_neg += 1;
            }
            (_, 1) => {
                self.neg += 1;
                self.false_pos += 1;
            }
            _ => {
                self.neg += 1;
                self.true_neg += 1;
            }
        }
    }

    /// Accuracy as a percentage; 0.0 for the degenerate empty evaluation.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        100.0 * self.correct as f64 / self.total as f64
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    /// Samples whose true label is 1.
    pub fn positives(&self) -> usize {
        self.pos
    }

    /// Samples whose true label is 0.
    pub fn negatives(&self) -> usize {
        self.neg
    }

    pub fn true_positives(&self) -> usize {
        self.true_pos
    }

    pub fn true_negatives(&self) -> usize {
        self.true_neg
    }

    pub fn false_positives(&self) -> usize {
        self.false_pos
    }

    pub fn false_negatives(&self) -> usize {
        self.false_neg
    }
}

/// Runs the classifier over every batch and accumulates the metrics.
///
/// Purely a forward pass: no parameter is updated anywhere. A sample is
/// predicted as class 1 iff `sigmoid(logit) >= threshold`.
///
/// # Arguments
/// * `model` - The classifier under evaluation.
/// * `batches` - Image/label batches, consumed in order.
/// * `threshold` - Decision threshold on the sigmoid probability.
///
/// # Returns
/// The finalized metrics, or an error when a batch violates a shape invariant.
pub fn evaluate<'a, I>(model: &BinaryCnn, batches: I, threshold: f32) -> Result<Metrics>
where
    I: IntoIterator<Item = (ArrayView4<'a, f32>, &'a [u8])>,
{
    let mut metrics = Metrics::default();

    for (images, labels) in batches {
        let logits = model.forward(images)?;
        if logits.len() != labels.len() {
            return Err(CnnError::ShapeMismatch {
                what: "batch labels",
                got: labels.len(),
                expected: logits.len(),
            });
        }

        for (&logit, &label) in logits.iter().zip(labels) {
            let pred = u8::from(sigmoid(logit) >= threshold);
            metrics.record(pred, label);
        }
        debug!(
            "evaluated batch of {}: running accuracy {:.2}%",
            labels.len(),
            metrics.accuracy()
        );
    }

    Ok(metrics)
}
