//! The join table between local survey artifacts and remote survey ids.
//!
//! Written after surveys are uploaded and read back before answers are, so
//! the two phases can run in separate invocations. Persisted as a flat JSON
//! object at [`JOIN_TABLE_KEY`]:
//!
//! ```json
//! { "1": "clx0k2m8x0000abcd", "2": "ERROR" }
//! ```

use std::collections::{BTreeMap, btree_map};

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  artifact::{ArtifactKind, parse_artifact_id},
  store::{BlobStore, read_json, write_json},
};

/// Storage key of the persisted join table.
pub const JOIN_TABLE_KEY: &str = "formbricks/formbricks_ids.json";

/// Sentinel persisted in place of a remote id when an upload failed.
pub const FAILED_SENTINEL: &str = "ERROR";

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Result of uploading one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UploadOutcome {
  /// The remote system accepted the item and assigned it this id.
  Created(String),
  /// The upload was rejected or never reached the remote system.
  Failed,
}

impl UploadOutcome {
  pub fn remote_id(&self) -> Option<&str> {
    match self {
      Self::Created(id) => Some(id),
      Self::Failed => None,
    }
  }

  pub fn is_created(&self) -> bool { matches!(self, Self::Created(_)) }
}

impl From<String> for UploadOutcome {
  fn from(raw: String) -> Self {
    if raw == FAILED_SENTINEL { Self::Failed } else { Self::Created(raw) }
  }
}

impl From<UploadOutcome> for String {
  fn from(outcome: UploadOutcome) -> Self {
    match outcome {
      UploadOutcome::Created(id) => id,
      UploadOutcome::Failed => FAILED_SENTINEL.to_owned(),
    }
  }
}

// ─── Table ───────────────────────────────────────────────────────────────────

/// Local survey id → upload outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoinTable(BTreeMap<String, UploadOutcome>);

impl JoinTable {
  pub fn new() -> Self { Self::default() }

  pub fn insert(&mut self, local_id: impl Into<String>, outcome: UploadOutcome) {
    self.0.insert(local_id.into(), outcome);
  }

  pub fn get(&self, local_id: &str) -> Option<&UploadOutcome> { self.0.get(local_id) }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn iter(&self) -> btree_map::Iter<'_, String, UploadOutcome> { self.0.iter() }

  /// `(local_id, remote_id)` for every successfully uploaded survey.
  pub fn created(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .0
      .iter()
      .filter_map(|(local, outcome)| Some((local.as_str(), outcome.remote_id()?)))
  }

  /// Local ids whose upload failed.
  pub fn failed(&self) -> impl Iterator<Item = &str> {
    self
      .0
      .iter()
      .filter(|(_, outcome)| !outcome.is_created())
      .map(|(local, _)| local.as_str())
  }

  /// Load the persisted table. Returns `None` if surveys were never uploaded.
  ///
  /// Keys written as artifact paths (`surveys/survey_1.json`) are normalised
  /// to their artifact id.
  pub async fn load<S: BlobStore>(store: &S) -> Result<Option<Self>> {
    let raw: Option<BTreeMap<String, UploadOutcome>> = read_json(store, JOIN_TABLE_KEY).await?;
    Ok(raw.map(|entries| {
      entries
        .into_iter()
        .map(|(key, outcome)| {
          let id = parse_artifact_id(ArtifactKind::Survey, &key).unwrap_or(key);
          (id, outcome)
        })
        .collect()
    }))
  }

  /// Persist the table, replacing any previous version.
  pub async fn save<S: BlobStore>(&self, store: &S) -> Result<()> {
    write_json(store, JOIN_TABLE_KEY, self).await
  }
}

impl FromIterator<(String, UploadOutcome)> for JoinTable {
  fn from_iter<I: IntoIterator<Item = (String, UploadOutcome)>>(iter: I) -> Self {
    Self(iter.into_iter().collect())
  }
}

impl IntoIterator for JoinTable {
  type Item = (String, UploadOutcome);
  type IntoIter = btree_map::IntoIter<String, UploadOutcome>;

  fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::memory::MemoryStore;

  #[test]
  fn failed_serialises_as_sentinel() {
    let mut table = JoinTable::new();
    table.insert("1", UploadOutcome::Created("abc".into()));
    table.insert("2", UploadOutcome::Failed);
    assert_eq!(
      serde_json::to_value(&table).unwrap(),
      json!({ "1": "abc", "2": "ERROR" })
    );
  }

  #[test]
  fn created_skips_failures() {
    let table: JoinTable = [
      ("1".to_string(), UploadOutcome::Created("abc".into())),
      ("2".to_string(), UploadOutcome::Failed),
    ]
    .into_iter()
    .collect();

    assert_eq!(table.created().collect::<Vec<_>>(), vec![("1", "abc")]);
    assert_eq!(table.failed().collect::<Vec<_>>(), vec!["2"]);
  }

  #[tokio::test]
  async fn load_missing_table_is_none() {
    let s = MemoryStore::new();
    assert!(JoinTable::load(&s).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn save_then_load() {
    let s = MemoryStore::new();
    let mut table = JoinTable::new();
    table.insert("1", UploadOutcome::Created("abc".into()));
    table.save(&s).await.unwrap();

    assert_eq!(JoinTable::load(&s).await.unwrap(), Some(table));
  }

  #[tokio::test]
  async fn load_normalises_path_keys() {
    let s = MemoryStore::new();
    write_json(
      &s,
      JOIN_TABLE_KEY,
      &json!({ "surveys/survey_4.json": "remote-4", "5": "ERROR" }),
    )
    .await
    .unwrap();

    let table = JoinTable::load(&s).await.unwrap().unwrap();
    assert_eq!(table.get("4"), Some(&UploadOutcome::Created("remote-4".into())));
    assert_eq!(table.get("5"), Some(&UploadOutcome::Failed));
  }
}
