//! Decoding of the big-endian IDX container the MNIST files ship in.

use std::path::Path;

use crate::{DataError, Result};

const IMAGES_MAGIC: u32 = 0x0000_0803;
const LABELS_MAGIC: u32 = 0x0000_0801;

/// Image width in pixels.
pub const WIDTH: usize = 28;
/// Image height in pixels.
pub const HEIGHT: usize = 28;
/// Bytes per image.
pub const PIXELS: usize = WIDTH * HEIGHT;

fn read_be_u32(bytes: &[u8], offset: usize, origin: &Path) -> Result<u32> {
    let end = offset + 4;
    if bytes.len() < end {
        return Err(DataError::Truncated {
            path: origin.to_path_buf(),
        });
    }
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..end]);
    Ok(u32::from_be_bytes(buf))
}

/// Decodes an IDX image file into flat row-major pixel bytes.
///
/// # Arguments
/// * `bytes` - The full file contents.
/// * `origin` - The file path, used only in error reports.
///
/// # Returns
/// `count * 784` pixel bytes, image-major.
pub fn parse_images(bytes: &[u8], origin: &Path) -> Result<Vec<u8>> {
    let magic = read_be_u32(bytes, 0, origin)?;
    if magic != IMAGES_MAGIC {
        return Err(DataError::BadMagic {
            path: origin.to_path_buf(),
            got: magic,
            expected: IMAGES_MAGIC,
        });
    }

    let count = read_be_u32(bytes, 4, origin)? as usize;
    let rows = read_be_u32(bytes, 8, origin)? as usize;
    let cols = read_be_u32(bytes, 12, origin)? as usize;
    if rows != HEIGHT || cols != WIDTH {
        return Err(DataError::BadImageShape { rows, cols });
    }

    let data = &bytes[16..];
    if data.len() < count * PIXELS {
        return Err(DataError::Truncated {
            path: origin.to_path_buf(),
        });
    }

    Ok(data[..count * PIXELS].to_vec())
}

/// Decodes an IDX label file into one byte per sample.
pub fn parse_labels(bytes: &[u8], origin: &Path) -> Result<Vec<u8>> {
    let magic = read_be_u32(bytes, 0, origin)?;
    if magic != LABELS_MAGIC {
        return Err(DataError::BadMagic {
            path: origin.to_path_buf(),
            got: magic,
            expected: LABELS_MAGIC,
        });
    }

    let count = read_be_u32(bytes, 4, origin)? as usize;
    let data = &bytes[8..];
    if data.len() < count {
        return Err(DataError::Truncated {
            path: origin.to_path_buf(),
        });
    }

    Ok(data[..count].to_vec())
}

#[cfg(test)]
pub(crate) fn encode_images(images: &[[u8; PIXELS]]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&IMAGES_MAGIC.to_be_bytes());
    bytes.extend_from_slice(&(images.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&(HEIGHT as u32).to_be_bytes());
    bytes.extend_from_slice(&(WIDTH as u32).to_be_bytes());
    for image in images {
        bytes.extend_from_slice(image);
    }
    bytes
}

#[cfg(test)]
pub(crate) fn encode_labels(labels: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&LABELS_MAGIC.to_be_bytes());
    bytes.extend_from_slice(&(labels.len() as u32).to_be_bytes());
    bytes.extend_from_slice(labels);
    bytes
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_images_roundtrip() {
        let mut first = [0u8; PIXELS];
        first[0] = 255;
        let second = [7u8; PIXELS];
        let bytes = encode_images(&[first, second]);

        let pixels = parse_images(&bytes, Path::new("images")).unwrap();
        assert_eq!(pixels.len(), 2 * PIXELS);
        assert_eq!(pixels[0], 255);
        assert_eq!(pixels[PIXELS], 7);
    }

    #[test]
    fn test_labels_roundtrip() {
        let bytes = encode_labels(&[0, 1, 9, 1]);
        let labels = parse_labels(&bytes, Path::new("labels")).unwrap();
        assert_eq!(labels, vec![0, 1, 9, 1]);
    }

    #[test]
    fn test_wrong_magic_is_rejected() {
        let bytes = encode_labels(&[0, 1]);
        let err = parse_images(&bytes, Path::new("images")).unwrap_err();
        assert!(matches!(err, DataError::BadMagic { .. }));
    }

    #[test]
    fn test_truncated_file_is_rejected() {
        let image = [1u8; PIXELS];
        let mut bytes = encode_images(&[image]);
        bytes.truncate(bytes.len() - 1);

        let err = parse_images(&bytes, Path::new("images")).unwrap_err();
        assert!(matches!(err, DataError::Truncated { .. }));
    }
}
