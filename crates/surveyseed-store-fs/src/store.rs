//! The filesystem implementation of [`BlobStore`].

use std::{
  io::ErrorKind,
  path::{Component, Path, PathBuf},
};

use surveyseed_core::store::BlobStore;

use crate::{Error, Result};

/// Artifacts stored as files under a root directory.
///
/// Cloning is cheap; it only copies the root path.
#[derive(Debug, Clone)]
pub struct FsStore {
  root: PathBuf,
}

impl FsStore {
  /// Open a store rooted at `root`. The directory is not created until the
  /// first write.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path { &self.root }

  /// Resolve `key` below the root, refusing anything that could escape it.
  fn resolve(&self, key: &str) -> Result<PathBuf> {
    let relative = Path::new(key);
    let mut parts = relative.components().peekable();
    if parts.peek().is_none() {
      return Err(Error::InvalidKey(key.to_owned()));
    }
    for part in parts {
      if !matches!(part, Component::Normal(_) | Component::CurDir) {
        return Err(Error::InvalidKey(key.to_owned()));
      }
    }
    Ok(self.root.join(relative))
  }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
  move |source| Error::Io { path: path.to_path_buf(), source }
}

impl BlobStore for FsStore {
  type Error = Error;

  async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
    let path = self.resolve(key)?;
    match tokio::fs::read(&path).await {
      Ok(bytes) => Ok(Some(bytes)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(io_error(&path)(e)),
    }
  }

  async fn write(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
    let path = self.resolve(key)?;
    if let Some(parent) = path.parent() {
      tokio::fs::create_dir_all(parent)
        .await
        .map_err(io_error(parent))?;
    }
    tokio::fs::write(&path, bytes).await.map_err(io_error(&path))?;
    tracing::debug!(path = %path.display(), "wrote artifact");
    Ok(())
  }

  async fn list(&self, dir: &str) -> Result<Vec<String>> {
    let path = self.resolve(dir)?;
    let mut entries = match tokio::fs::read_dir(&path).await {
      Ok(entries) => entries,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
      Err(e) => return Err(io_error(&path)(e)),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_error(&path))? {
      let file_type = entry.file_type().await.map_err(io_error(&path))?;
      if !file_type.is_file() {
        continue;
      }
      if let Some(name) = entry.file_name().to_str() {
        names.push(name.to_owned());
      }
    }
    names.sort();
    Ok(names)
  }
}
