use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the on-disk scrape cache.
#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot access cache file {}: {}", .0.display(), .1)]
    IOError(PathBuf, #[source] std::io::Error),
    #[error("Cannot encode/decode cache file {}: {}", .0.display(), .1)]
    JSONError(PathBuf, #[source] serde_json::Error),
}

impl Error {
    pub fn path(&self) -> &Path {
        match self {
            Error::IOError(path, _) | Error::JSONError(path, _) => path,
        }
    }
}
