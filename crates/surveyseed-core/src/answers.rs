//! Synthetic respondent answers.
//!
//! An answers artifact (`answers/answers_{id}.json`) is a JSON object keyed
//! by respondent id (`user_001`, …). Each respondent only carries answers for
//! the questions that the survey logic would have shown them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// All respondents for one survey, keyed by respondent id.
pub type AnswerBatch = BTreeMap<String, AnswerSet>;

/// Prefix every respondent id carries.
pub const RESPONDENT_PREFIX: &str = "user_";

/// `user_001` and friends; anything else is not a respondent.
pub fn is_respondent_id(id: &str) -> bool {
  id.strip_prefix(RESPONDENT_PREFIX).is_some_and(|rest| !rest.is_empty())
}

/// One respondent's answers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnswerSet {
  pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
  pub question_id: String,
  pub value:       Value,
}

impl AnswerSet {
  /// Build an answer set from `(question_id, value)` pairs.
  pub fn from_pairs<I, K>(pairs: I) -> Self
  where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
  {
    Self {
      answers: pairs
        .into_iter()
        .map(|(question_id, value)| Answer {
          question_id: question_id.into(),
          value,
        })
        .collect(),
    }
  }
}
