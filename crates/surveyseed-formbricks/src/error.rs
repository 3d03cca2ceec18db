//! Error types for `surveyseed-formbricks`.

use thiserror::Error;

use crate::precondition::NotReady;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] surveyseed_core::Error),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{endpoint} → {status}: {body}")]
  Status {
    endpoint: &'static str,
    status:   reqwest::StatusCode,
    body:     String,
  },

  #[error("cannot seed: {0}")]
  NotReady(#[from] NotReady),

  #[error("no survey ids recorded yet; upload surveys first")]
  MissingJoinTable,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A survey that cannot be expressed as a Formbricks block graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
  #[error("question {0:?} appears more than once")]
  DuplicateQuestion(String),

  #[error("question {question:?} uses unknown operator {operator:?}")]
  UnknownOperator { question: String, operator: String },

  #[error("question {question:?} jumps to unknown question {target:?}")]
  UnknownJumpTarget { question: String, target: String },

  #[error("rating question {0:?} has no rating.max_value")]
  MissingRatingScale(String),

  #[error("choice question {0:?} has no config.choices")]
  MissingChoices(String),
}
