//! Answer set → Formbricks response record.

use chrono::{DateTime, Utc};
use serde_json::Map;
use surveyseed_core::answers::AnswerSet;

use crate::payload::ResponsePayload;

/// Per-response settings that are not part of the answers themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseOptions {
  pub language: String,
  pub finished: bool,
}

impl Default for ResponseOptions {
  fn default() -> Self {
    Self { language: "en".to_owned(), finished: true }
  }
}

/// Map one respondent's answers, stamped with the current time.
pub fn map_response(
  answers: &AnswerSet,
  survey_id: &str,
  environment_id: &str,
  options: &ResponseOptions,
) -> ResponsePayload {
  map_response_at(answers, survey_id, environment_id, options, Utc::now())
}

/// Map one respondent's answers with an explicit timestamp.
///
/// Answers are copied through unvalidated. If a question is answered twice
/// the later value wins.
pub fn map_response_at(
  answers: &AnswerSet,
  survey_id: &str,
  environment_id: &str,
  options: &ResponseOptions,
  now: DateTime<Utc>,
) -> ResponsePayload {
  let data: Map<_, _> = answers
    .answers
    .iter()
    .map(|a| (a.question_id.clone(), a.value.clone()))
    .collect();

  ResponsePayload {
    created_at: now,
    updated_at: now,
    finished: options.finished,
    language: options.language.clone(),
    survey_id: survey_id.to_owned(),
    environment_id: environment_id.to_owned(),
    data,
  }
}
