//! MNIST acquisition and the 0-vs-1 subset the evaluation runs on.

mod download;
mod error;
mod idx;

use std::num::NonZeroUsize;
use std::path::Path;

use log::{debug, info};
use ndarray::{Array4, ArrayView4, s};

pub use error::{DataError, Result};
pub use idx::{HEIGHT, PIXELS, WIDTH};

const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

/// The dataset split to evaluate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    fn files(self) -> (&'static str, &'static str) {
        match self {
            Split::Train => (TRAIN_IMAGES, TRAIN_LABELS),
            Split::Test => (TEST_IMAGES, TEST_LABELS),
        }
    }

    /// Capitalized tag used in the report line.
    pub fn tag(self) -> &'static str {
        match self {
            Split::Train => "Train",
            Split::Test => "Test",
        }
    }
}

/// The MNIST digits filtered to labels {0, 1}, in original relative order,
/// with pixel intensities normalized to [0, 1].
#[derive(Debug)]
pub struct Mnist01 {
    images: Array4<f32>,
    labels: Vec<u8>,
}

impl Mnist01 {
    /// Downloads (if needed), decodes and filters one split.
    ///
    /// Files come gzipped from the CVDF mirror and are cached decoded under
    /// `<data_dir>/MNIST/raw`. Acquisition errors are fatal; there is no
    /// retry logic.
    ///
    /// # Arguments
    /// * `data_dir` - Cache directory for the raw dataset files.
    /// * `split` - Which split to load.
    pub fn load(data_dir: &Path, split: Split) -> Result<Self> {
        let raw_dir = data_dir.join("MNIST").join("raw");
        let (images_name, labels_name) = split.files();

        let client = download::client()?;
        let images_path = download::fetch(&client, images_name, &raw_dir)?;
        let labels_path = download::fetch(&client, labels_name, &raw_dir)?;

        let read = |path: &Path| {
            std::fs::read(path).map_err(|source| DataError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        let pixels = idx::parse_images(&read(&images_path)?, &images_path)?;
        let labels = idx::parse_labels(&read(&labels_path)?, &labels_path)?;

        let dataset = Self::from_raw(pixels, labels)?;
        info!(
            "loaded {} 0/1 samples from the {} split",
            dataset.len(),
            split.tag()
        );
        Ok(dataset)
    }

    /// Builds the subset from already-decoded pixel and label bytes,
    /// keeping only labels 0 and 1 and preserving their relative order.
    ///
    /// # Arguments
    /// * `pixels` - `count * 784` bytes, image-major row-major.
    /// * `labels` - One digit label (0-9) per image.
    pub fn from_raw(pixels: Vec<u8>, labels: Vec<u8>) -> Result<Self> {
        if pixels.len() != labels.len() * PIXELS {
            return Err(DataError::CountMismatch {
                images: pixels.len() / PIXELS,
                labels: labels.len(),
            });
        }

        let keep: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label <= 1)
            .map(|(i, _)| i)
            .collect();
        debug!("kept {} of {} samples", keep.len(), labels.len());

        let mut data = Vec::with_capacity(keep.len() * PIXELS);
        for &i in &keep {
            let image = &pixels[i * PIXELS..(i + 1) * PIXELS];
            data.extend(image.iter().map(|&p| p as f32 / 255.0));
        }
        let images = Array4::from_shape_vec((keep.len(), 1, HEIGHT, WIDTH), data)
            .expect("element count matches the kept samples");
        let labels = keep.into_iter().map(|i| labels[i]).collect();

        Ok(Self { images, labels })
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Yields borrowing batches in fixed order; the last batch may be short.
    ///
    /// # Arguments
    /// * `batch_size` - Samples per batch.
    pub fn batches(
        &self,
        batch_size: NonZeroUsize,
    ) -> impl Iterator<Item = (ArrayView4<'_, f32>, &[u8])> {
        let size = batch_size.get();
        let n = self.len();

        (0..n).step_by(size).map(move |start| {
            let end = (start + size).min(n);
            (
                self.images.slice(s![start..end, .., .., ..]),
                &self.labels[start..end],
            )
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn flat_images(fills: &[u8]) -> Vec<u8> {
        let mut pixels = Vec::with_capacity(fills.len() * PIXELS);
        for &fill in fills {
            pixels.extend(std::iter::repeat_n(fill, PIXELS));
        }
        pixels
    }

    #[test]
    fn test_filter_keeps_zeros_and_ones_in_order() {
        let labels = vec![5, 0, 1, 9, 1, 0, 3];
        let pixels = flat_images(&[50, 0, 1, 90, 2, 3, 30]);

        let dataset = Mnist01::from_raw(pixels, labels).unwrap();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.labels, vec![0, 1, 1, 0]);
        // First kept image is the all-zero one, second the all-1 fill.
        assert_eq!(dataset.images[[0, 0, 0, 0]], 0.0);
        assert_eq!(dataset.images[[1, 0, 0, 0]], 1.0 / 255.0);
        assert_eq!(dataset.images[[2, 0, 0, 0]], 2.0 / 255.0);
        assert_eq!(dataset.images[[3, 0, 0, 0]], 3.0 / 255.0);
    }

    #[test]
    fn test_pixels_are_normalized() {
        let dataset = Mnist01::from_raw(flat_images(&[255]), vec![1]).unwrap();
        assert_eq!(dataset.images[[0, 0, 27, 27]], 1.0);
    }

    #[test]
    fn test_count_mismatch_is_rejected() {
        let err = Mnist01::from_raw(flat_images(&[0, 1]), vec![0]).unwrap_err();
        assert!(matches!(err, DataError::CountMismatch { .. }));
    }

    #[test]
    fn test_batches_chunk_with_short_tail() {
        let dataset = Mnist01::from_raw(flat_images(&[0; 5]), vec![0, 1, 0, 1, 0]).unwrap();

        let sizes: Vec<usize> = dataset
            .batches(NonZeroUsize::new(2).unwrap())
            .map(|(images, labels)| {
                assert_eq!(images.dim().0, labels.len());
                labels.len()
            })
            .collect();
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[test]
    fn test_batches_cover_everything_once() {
        let dataset = Mnist01::from_raw(flat_images(&[0; 4]), vec![0, 1, 1, 0]).unwrap();

        let seen: Vec<u8> = dataset
            .batches(NonZeroUsize::new(3).unwrap())
            .flat_map(|(_, labels)| labels.iter().copied())
            .collect();
        assert_eq!(seen, vec![0, 1, 1, 0]);
    }
}
