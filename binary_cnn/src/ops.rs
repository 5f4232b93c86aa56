//! The layer operations of the classifier as pure functions over `ndarray`
//! views. The topology never varies, so there is no layer trait or dynamic
//! dispatch; the model applies these in a fixed order.

use ndarray::{Array2, Array4, ArrayView1, ArrayView2, ArrayView4};

use crate::{CnnError, Result};

/// Valid (no padding) 2-D convolution with stride 1 and per-output-channel bias.
///
/// # Arguments
/// * `x` - Input batch, [batch, in-channel, height, width].
/// * `w` - Kernel, [out-channel, in-channel, kernel-row, kernel-col].
/// * `b` - One bias per output channel.
///
/// # Returns
/// The convolved batch, [batch, out-channel, height-k+1, width-k+1].
pub fn conv2d_valid(
    x: ArrayView4<f32>,
    w: ArrayView4<f32>,
    b: ArrayView1<f32>,
) -> Result<Array4<f32>> {
    let (n, c_in, h, wd) = x.dim();
    let (c_out, kc_in, kh, kw) = w.dim();

    if c_in != kc_in {
        return Err(CnnError::ShapeMismatch {
            what: "input channels",
            got: c_in,
            expected: kc_in,
        });
    }
    if b.len() != c_out {
        return Err(CnnError::ShapeMismatch {
            what: "conv biases",
            got: b.len(),
            expected: c_out,
        });
    }
    if h < kh || wd < kw {
        return Err(CnnError::ShapeMismatch {
            what: "input smaller than kernel",
            got: h.min(wd),
            expected: kh.max(kw),
        });
    }

    let (oh, ow) = (h - kh + 1, wd - kw + 1);
    let mut out = Array4::zeros((n, c_out, oh, ow));
    for ni in 0..n {
        for co in 0..c_out {
            for i in 0..oh {
                for j in 0..ow {
                    let mut acc = b[co];
                    for ci in 0..c_in {
                        for ki in 0..kh {
                            for kj in 0..kw {
                                acc += w[[co, ci, ki, kj]] * x[[ni, ci, i + ki, j + kj]];
                            }
                        }
                    }
                    out[[ni, co, i, j]] = acc;
                }
            }
        }
    }

    Ok(out)
}

/// Elementwise rectified-linear activation.
pub fn relu_inplace(x: &mut Array4<f32>) {
    x.mapv_inplace(|v| v.max(0.0));
}

/// 2x2 max pooling with stride 2. Trailing rows/columns that do not fill a
/// window are dropped.
pub fn max_pool2x2(x: ArrayView4<f32>) -> Array4<f32> {
    let (n, c, h, w) = x.dim();
    let (oh, ow) = (h / 2, w / 2);

    let mut out = Array4::zeros((n, c, oh, ow));
    for ni in 0..n {
        for ci in 0..c {
            for i in 0..oh {
                for j in 0..ow {
                    let (r, s) = (2 * i, 2 * j);
                    out[[ni, ci, i, j]] = x[[ni, ci, r, s]]
                        .max(x[[ni, ci, r, s + 1]])
                        .max(x[[ni, ci, r + 1, s]])
                        .max(x[[ni, ci, r + 1, s + 1]]);
                }
            }
        }
    }

    out
}

/// Flattens each sample to a vector in [channel, row, col] row-major order.
pub fn flatten_batch(x: ArrayView4<f32>) -> Array2<f32> {
    let (n, c, h, w) = x.dim();
    let flat: Vec<f32> = x.iter().copied().collect();
    Array2::from_shape_vec((n, c * h * w), flat).expect("element count is preserved")
}

/// Fully-connected projection: `x . w^T + b`, one row per sample.
pub fn linear(
    x: ArrayView2<f32>,
    w: ArrayView2<f32>,
    b: ArrayView1<f32>,
) -> Result<Array2<f32>> {
    if x.ncols() != w.ncols() {
        return Err(CnnError::ShapeMismatch {
            what: "fc inputs",
            got: x.ncols(),
            expected: w.ncols(),
        });
    }

    Ok(x.dot(&w.t()) + &b)
}

#[cfg(test)]
mod test {
    use ndarray::{Array1, Axis, array};

    use super::*;

    #[test]
    fn test_conv2d_valid_hand_computed() {
        // One 2x2 kernel over a single 3x3 image.
        let x = array![[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]].insert_axis(Axis(0));
        let w = array![[[1.0, 0.0], [0.0, -1.0]]].insert_axis(Axis(0));
        let b = Array1::from_vec(vec![0.5]);

        let out = conv2d_valid(x.view(), w.view(), b.view()).unwrap();
        assert_eq!(out.dim(), (1, 1, 2, 2));
        assert_eq!(out[[0, 0, 0, 0]], 1.0 - 5.0 + 0.5);
        assert_eq!(out[[0, 0, 0, 1]], 2.0 - 6.0 + 0.5);
        assert_eq!(out[[0, 0, 1, 0]], 4.0 - 8.0 + 0.5);
        assert_eq!(out[[0, 0, 1, 1]], 5.0 - 9.0 + 0.5);
    }

    #[test]
    fn test_conv2d_rejects_channel_mismatch() {
        let x = Array4::<f32>::zeros((1, 2, 4, 4));
        let w = Array4::<f32>::zeros((3, 1, 3, 3));
        let b = Array1::<f32>::zeros(3);

        assert!(conv2d_valid(x.view(), w.view(), b.view()).is_err());
    }

    #[test]
    fn test_relu_clamps_negatives() {
        let mut x = array![[[-1.0, 0.0], [2.5, -0.1]]].insert_axis(Axis(0));
        relu_inplace(&mut x);
        assert_eq!(x, array![[[0.0, 0.0], [2.5, 0.0]]].insert_axis(Axis(0)));
    }

    #[test]
    fn test_max_pool2x2_takes_window_maximum() {
        let x = array![[
            [1.0, 2.0, 0.0, 0.0],
            [3.0, 4.0, 0.0, -1.0],
            [0.0, 0.0, 5.0, 6.0],
            [0.0, 0.0, 7.0, 8.0]
        ]]
        .insert_axis(Axis(0));

        let out = max_pool2x2(x.view());
        assert_eq!(out, array![[[4.0, 0.0], [0.0, 8.0]]].insert_axis(Axis(0)));
    }

    #[test]
    fn test_flatten_is_channel_major() {
        let x = array![[[1.0, 2.0], [3.0, 4.0]], [[5.0, 6.0], [7.0, 8.0]]].insert_axis(Axis(0));

        let flat = flatten_batch(x.view());
        assert_eq!(flat.dim(), (1, 8));
        assert_eq!(
            flat.row(0).to_vec(),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]
        );
    }

    #[test]
    fn test_linear_projects_each_row() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let w = array![[10.0, 100.0]];
        let b = Array1::from_vec(vec![1.0]);

        let out = linear(x.view(), w.view(), b.view()).unwrap();
        assert_eq!(out, array![[211.0], [431.0]]);
    }

    #[test]
    fn test_linear_rejects_width_mismatch() {
        let x = array![[1.0, 2.0, 3.0]];
        let w = array![[1.0, 2.0]];
        let b = Array1::from_vec(vec![0.0]);

        assert!(linear(x.view(), w.view(), b.view()).is_err());
    }
}
