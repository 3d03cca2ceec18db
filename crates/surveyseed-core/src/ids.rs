//! Identifier generation for mapped payloads.
//!
//! Block, rule, condition and action ids are minted while a survey is
//! mapped. Production code uses [`RandomIds`]; tests inject
//! [`SequentialIds`] to get reproducible output.

use uuid::Uuid;

/// Length of a random id: 24 lowercase hex characters.
pub const RANDOM_ID_LEN: usize = 24;

/// A source of fresh, unique identifiers.
pub trait IdGenerator {
  fn next_id(&mut self) -> String;
}

/// Collision-resistant random ids cut from a v4 UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
  fn next_id(&mut self) -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(RANDOM_ID_LEN);
    id
  }
}

/// Deterministic ids: `{prefix}0001`, `{prefix}0002`, …
#[derive(Debug, Clone)]
pub struct SequentialIds {
  prefix: String,
  issued: u64,
}

impl SequentialIds {
  pub fn new(prefix: impl Into<String>) -> Self {
    Self { prefix: prefix.into(), issued: 0 }
  }

  /// How many ids have been handed out so far.
  pub fn issued(&self) -> u64 { self.issued }
}

impl Default for SequentialIds {
  fn default() -> Self { Self::new("id") }
}

impl IdGenerator for SequentialIds {
  fn next_id(&mut self) -> String {
    self.issued += 1;
    format!("{}{:04}", self.prefix, self.issued)
  }
}
