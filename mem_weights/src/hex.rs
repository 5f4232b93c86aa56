use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::{Result, WeightsError};

/// Decodes a hex token as a `bits`-wide two's-complement integer.
///
/// The token is first read as an unsigned hexadecimal literal; values with the
/// high bit set are folded into the negative range (v >= 2^(bits-1) maps to
/// v - 2^bits). Supported widths are 1..=32 bits.
///
/// # Arguments
/// * `token` - A raw hex token, without `0x` prefix.
/// * `bits` - The declared width of the stored integer.
///
/// # Returns
/// The signed value, or `None` when the token is not valid hexadecimal or does
/// not fit in `bits`.
pub fn parse_hex_signed(token: &str, bits: u32) -> Option<i64> {
    debug_assert!(bits >= 1 && bits <= 32);

    let v = u64::from_str_radix(token, 16).ok()?;
    if v >> bits != 0 {
        return None;
    }

    let half = 1u64 << (bits - 1);
    if v >= half {
        Some(v as i64 - (1i64 << bits))
    } else {
        Some(v as i64)
    }
}

/// Reads a `.mem` dump into an ordered sequence of signed integers.
///
/// One hex token per line; blank lines and `//` comment lines are skipped.
/// Order is significant, it defines row-major placement into the destination
/// tensor.
///
/// # Arguments
/// * `path` - The dump to read.
/// * `bits` - The two's-complement width of every token in the file.
///
/// # Returns
/// The decoded values in file order, or an error naming the file and the
/// offending line.
pub fn load_mem_ints(path: &Path, bits: u32) -> Result<Vec<i64>> {
    let file = File::open(path).map_err(|source| WeightsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut vals = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| WeightsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let s = line.trim();
        if s.is_empty() || s.starts_with("//") {
            continue;
        }

        let v = parse_hex_signed(s, bits).ok_or_else(|| WeightsError::Parse {
            path: path.to_path_buf(),
            line: s.to_string(),
        })?;
        vals.push(v);
    }

    Ok(vals)
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_roundtrip_8_bit() {
        for v in i8::MIN..=i8::MAX {
            let token = format!("{:02x}", v as u8);
            assert_eq!(parse_hex_signed(&token, 8), Some(v as i64), "token {token}");
        }
    }

    #[test]
    fn test_roundtrip_32_bit_extremes() {
        for v in [i32::MIN, -4096, -1, 0, 1, 4096, i32::MAX] {
            let token = format!("{:08x}", v as u32);
            assert_eq!(parse_hex_signed(&token, 32), Some(v as i64), "token {token}");
        }
    }

    #[test]
    fn test_high_bit_is_negative() {
        assert_eq!(parse_hex_signed("ff", 8), Some(-1));
        assert_eq!(parse_hex_signed("80", 8), Some(-128));
        assert_eq!(parse_hex_signed("7f", 8), Some(127));
        assert_eq!(parse_hex_signed("ffffffff", 32), Some(-1));
    }

    #[test]
    fn test_rejects_non_hex_and_overflow() {
        assert_eq!(parse_hex_signed("zz", 8), None);
        assert_eq!(parse_hex_signed("", 8), None);
        // 0x100 needs 9 bits.
        assert_eq!(parse_hex_signed("100", 8), None);
    }

    #[test]
    fn test_load_skips_comments_and_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "// kernel row 0\n01\n\n  02  \n// trailing comment\nff\n"
        )
        .unwrap();

        let vals = load_mem_ints(file.path(), 8).unwrap();
        assert_eq!(vals, vec![1, 2, -1]);
    }

    #[test]
    fn test_load_reports_bad_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "00\nzz\n01\n").unwrap();

        let err = load_mem_ints(file.path(), 8).unwrap_err();
        match err {
            WeightsError::Parse { path, line } => {
                assert_eq!(path, file.path());
                assert_eq!(line, "zz");
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }
}
