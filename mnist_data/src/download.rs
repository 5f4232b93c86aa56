use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::info;
use reqwest::blocking::Client;

use crate::{DataError, Result};

// CVDF mirror of http://yann.lecun.com/exdb/mnist/
const MIRROR: &str = "https://storage.googleapis.com/cvdf-datasets/mnist/";

/// Builds the blocking HTTP client shared by the dataset fetches.
pub(crate) fn client() -> Result<Client> {
    Client::builder().build().map_err(|source| DataError::Download {
        url: MIRROR.to_string(),
        source,
    })
}

/// Fetches one gzipped IDX file and stores it decoded, skipping the download
/// when the decoded file already exists (no clobber).
///
/// # Arguments
/// * `client` - Shared blocking HTTP client.
/// * `name` - Bare IDX file name, e.g. `t10k-images-idx3-ubyte`.
/// * `dest_dir` - Directory the decoded file lands in.
///
/// # Returns
/// The path of the decoded file.
pub(crate) fn fetch(client: &Client, name: &str, dest_dir: &Path) -> Result<PathBuf> {
    let target = dest_dir.join(name);
    if target.exists() {
        return Ok(target);
    }

    fs::create_dir_all(dest_dir).map_err(|source| DataError::Io {
        path: dest_dir.to_path_buf(),
        source,
    })?;

    let url = format!("{MIRROR}{name}.gz");
    info!("downloading {url}");
    let res = client
        .get(&url)
        .send()
        .map_err(|source| DataError::Download {
            url: url.clone(),
            source,
        })?;
    let status = res.status();
    if !status.is_success() {
        return Err(DataError::HttpStatus {
            url,
            status: status.as_u16(),
        });
    }
    let body = res.bytes().map_err(|source| DataError::Download {
        url: url.clone(),
        source,
    })?;

    let mut gz = GzDecoder::new(body.as_ref());
    let mut out = File::create(&target).map_err(|source| DataError::Io {
        path: target.clone(),
        source,
    })?;
    io::copy(&mut gz, &mut out).map_err(|source| DataError::Io {
        path: target.clone(),
        source,
    })?;

    Ok(target)
}
