//! An in-process [`BlobStore`]: [`MemoryStore`].

use std::{collections::BTreeMap, convert::Infallible, sync::Arc};

use parking_lot::RwLock;

use crate::store::BlobStore;

/// A blob store held entirely in memory; useful for tests and dry runs.
///
/// Cloning is cheap and clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  blobs: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// All keys currently stored, in order.
  pub fn keys(&self) -> Vec<String> {
    self.blobs.read().keys().cloned().collect()
  }
}

impl BlobStore for MemoryStore {
  type Error = Infallible;

  async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
    Ok(self.blobs.read().get(key).cloned())
  }

  async fn write(&self, key: &str, bytes: Vec<u8>) -> Result<(), Self::Error> {
    self.blobs.write().insert(key.to_owned(), bytes);
    Ok(())
  }

  async fn list(&self, dir: &str) -> Result<Vec<String>, Self::Error> {
    let prefix = format!("{}/", dir.trim_end_matches('/'));
    Ok(
      self
        .blobs
        .read()
        .keys()
        .filter_map(|key| key.strip_prefix(&prefix))
        .filter(|rest| !rest.contains('/'))
        .map(str::to_owned)
        .collect(),
    )
  }
}
