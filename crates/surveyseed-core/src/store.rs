//! The `BlobStore` trait and the typed [`Repository`] built on top of it.
//!
//! Backends (e.g. `surveyseed-store-fs`, or the in-process
//! [`crate::memory::MemoryStore`]) only move opaque bytes around under
//! slash-separated keys. Everything above that, JSON encoding and artifact
//! naming, lives here so that every backend behaves the same.

use std::{collections::BTreeSet, future::Future, marker::PhantomData};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
  Error, Result,
  answers::AnswerBatch,
  artifact::{ArtifactKind, artifact_key, parse_artifact_id},
  survey::SurveyDocument,
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over durable storage for artifacts.
///
/// Keys are slash-separated relative paths such as `surveys/survey_1.json`.
/// Blobs are always read and written whole.
pub trait BlobStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the blob at `key`. Returns `None` if it does not exist.
  fn read<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>> + Send + 'a;

  /// Create or replace the blob at `key`, creating parent directories as
  /// needed.
  fn write<'a>(
    &'a self,
    key: &'a str,
    bytes: Vec<u8>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// File names (not full keys) directly inside `dir`. A missing directory
  /// lists as empty.
  fn list<'a>(
    &'a self,
    dir: &'a str,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;
}

// ─── JSON helpers ────────────────────────────────────────────────────────────

/// Read and decode the JSON blob at `key`.
pub async fn read_json<S, T>(store: &S, key: &str) -> Result<Option<T>>
where
  S: BlobStore,
  T: DeserializeOwned,
{
  match store.read(key).await.map_err(Error::store)? {
    Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
    None => Ok(None),
  }
}

/// Encode `value` as pretty-printed JSON and write it to `key`.
pub async fn write_json<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
  S: BlobStore,
  T: Serialize + ?Sized,
{
  let bytes = serde_json::to_vec_pretty(value)?;
  store.write(key, bytes).await.map_err(Error::store)
}

// ─── Repository ──────────────────────────────────────────────────────────────

/// Typed access to one kind of artifact.
pub struct Repository<'s, S, T> {
  store: &'s S,
  kind:  ArtifactKind,
  _item: PhantomData<fn() -> T>,
}

impl<'s, S, T> Repository<'s, S, T>
where
  S: BlobStore,
  T: Serialize + DeserializeOwned,
{
  pub fn new(store: &'s S, kind: ArtifactKind) -> Self {
    Self { store, kind, _item: PhantomData }
  }

  pub fn kind(&self) -> ArtifactKind { self.kind }

  /// Load artifact `id`. Returns `None` if it has not been generated.
  pub async fn get(&self, id: &str) -> Result<Option<T>> {
    read_json(self.store, &artifact_key(self.kind, id)).await
  }

  /// Store artifact `id`, replacing any previous version.
  pub async fn put(&self, id: &str, item: &T) -> Result<()> {
    write_json(self.store, &artifact_key(self.kind, id), item).await
  }

  /// Ids of every stored artifact of this kind. Files in the directory that
  /// do not follow the naming scheme are ignored.
  pub async fn list_ids(&self) -> Result<BTreeSet<String>> {
    let names = self
      .store
      .list(self.kind.dir())
      .await
      .map_err(Error::store)?;

    let mut ids = BTreeSet::new();
    for name in names {
      match parse_artifact_id(self.kind, &name) {
        Some(id) => {
          ids.insert(id);
        }
        None => {
          tracing::debug!(dir = self.kind.dir(), file = %name, "ignoring non-artifact file");
        }
      }
    }
    Ok(ids)
  }
}

/// Repository of generated surveys.
pub fn surveys<S: BlobStore>(store: &S) -> Repository<'_, S, SurveyDocument> {
  Repository::new(store, ArtifactKind::Survey)
}

/// Repository of generated answer batches.
pub fn answers<S: BlobStore>(store: &S) -> Repository<'_, S, AnswerBatch> {
  Repository::new(store, ArtifactKind::Answers)
}
