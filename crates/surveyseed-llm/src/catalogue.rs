//! The list of survey goals to generate from.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use surveyseed_core::store::{BlobStore, read_json};

use crate::{GenerationError, Result};

/// Storage key of the prompt catalogue.
pub const CATALOGUE_KEY: &str = "prompts/survey_description_prompts.json";

/// `{"surveys": [{"id": 1, "prompt": "..."}]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptCatalogue {
  #[serde(default)]
  pub surveys: Vec<SurveyPrompt>,
}

/// One survey goal. The id becomes the artifact id of everything generated
/// from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyPrompt {
  #[serde(deserialize_with = "id_from_scalar")]
  pub id:     String,
  pub prompt: String,
}

// Catalogues are hand-written; accept `1` as well as `"1"`.
fn id_from_scalar<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<String, D::Error> {
  match Value::deserialize(de)? {
    Value::String(s) => Ok(s),
    Value::Number(n) => Ok(n.to_string()),
    other => Err(serde::de::Error::custom(format!(
      "survey id must be a string or number, got {other}"
    ))),
  }
}

impl PromptCatalogue {
  pub async fn load<S: BlobStore>(store: &S) -> Result<Self> {
    read_json(store, CATALOGUE_KEY)
      .await?
      .ok_or(GenerationError::MissingCatalogue(CATALOGUE_KEY))
  }
}
