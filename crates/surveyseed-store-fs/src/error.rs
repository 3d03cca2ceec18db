//! Error type for `surveyseed-store-fs`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("i/o error at {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// Absolute keys and keys containing `..` would escape the root.
  #[error("invalid storage key: {0:?}")]
  InvalidKey(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
