//! Checks that must pass before anything is uploaded.

use std::collections::BTreeSet;

use surveyseed_core::store::{self, BlobStore};
use thiserror::Error;

/// Why seeding cannot start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotReady {
  #[error("no environment id or api key configured")]
  MissingCredentials,

  #[error(
    "surveys and answers count are not matching: {surveys} survey(s), {answers} answer set(s)"
  )]
  CountMismatch { surveys: usize, answers: usize },

  #[error(
    "surveys and answers ids are not matching: surveys without answers {without_answers:?}, \
     answers without survey {without_survey:?}"
  )]
  IdMismatch {
    without_answers: Vec<String>,
    without_survey:  Vec<String>,
  },

  #[error("cannot inspect artifacts: {0}")]
  Storage(String),
}

/// Credentials that passed [`can_proceed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
  pub environment_id: &'a str,
  pub api_key:        &'a str,
}

/// Full pre-upload check: credentials present, then [`check_artifacts`].
///
/// Blank strings count as missing.
pub async fn can_proceed<'a, S: BlobStore>(
  environment_id: Option<&'a str>,
  api_key: Option<&'a str>,
  store: &S,
) -> Result<Credentials<'a>, NotReady> {
  let present = |v: Option<&'a str>| v.filter(|s| !s.trim().is_empty());
  let (Some(environment_id), Some(api_key)) = (present(environment_id), present(api_key)) else {
    return Err(NotReady::MissingCredentials);
  };
  check_artifacts(store).await?;
  Ok(Credentials { environment_id, api_key })
}

/// Every generated survey has an answer artifact and vice versa.
pub async fn check_artifacts<S: BlobStore>(store: &S) -> Result<(), NotReady> {
  let storage = |e: surveyseed_core::Error| NotReady::Storage(e.to_string());
  let surveys = store::surveys(store).list_ids().await.map_err(storage)?;
  let answers = store::answers(store).list_ids().await.map_err(storage)?;

  if surveys.len() != answers.len() {
    return Err(NotReady::CountMismatch { surveys: surveys.len(), answers: answers.len() });
  }
  if surveys != answers {
    let missing = |a: &BTreeSet<String>, b: &BTreeSet<String>| a.difference(b).cloned().collect();
    return Err(NotReady::IdMismatch {
      without_answers: missing(&surveys, &answers),
      without_survey:  missing(&answers, &surveys),
    });
  }
  Ok(())
}
