//! Sequential batch uploads with per-item outcomes.
//!
//! A failed item is logged and recorded as [`UploadOutcome::Failed`]; the
//! batch always runs to the end. Nothing is retried.

use std::collections::BTreeMap;

use surveyseed_core::join::{JoinTable, UploadOutcome};

use crate::{
  client::ManagementApi,
  payload::{ResponsePayload, SurveyPayload},
};

/// Upload every survey in key order. Returns the outcome per local id.
pub async fn upload_surveys<A>(api: &A, payloads: &BTreeMap<String, SurveyPayload>) -> JoinTable
where
  A: ManagementApi,
{
  let mut table = JoinTable::new();
  for (local_id, payload) in payloads {
    let outcome = match api.create_survey(payload).await {
      Ok(remote_id) => {
        tracing::info!(survey = %local_id, %remote_id, "uploaded survey");
        UploadOutcome::Created(remote_id)
      }
      Err(e) => {
        tracing::warn!(survey = %local_id, error = %e, "survey upload failed");
        UploadOutcome::Failed
      }
    };
    table.insert(local_id.clone(), outcome);
  }
  table
}

/// Upload every response in key order. Returns the outcome per respondent.
pub async fn upload_answers<A>(
  api: &A,
  payloads: &BTreeMap<String, ResponsePayload>,
) -> BTreeMap<String, UploadOutcome>
where
  A: ManagementApi,
{
  let mut outcomes = BTreeMap::new();
  for (user_id, payload) in payloads {
    let outcome = match api.create_response(payload).await {
      Ok(remote_id) => {
        tracing::debug!(respondent = %user_id, %remote_id, "uploaded response");
        UploadOutcome::Created(remote_id)
      }
      Err(e) => {
        tracing::warn!(respondent = %user_id, survey = %payload.survey_id, error = %e, "response upload failed");
        UploadOutcome::Failed
      }
    };
    outcomes.insert(user_id.clone(), outcome);
  }
  let failed = outcomes.values().filter(|o| !o.is_created()).count();
  tracing::info!(total = outcomes.len(), failed, "uploaded responses");
  outcomes
}
