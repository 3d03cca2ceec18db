//! Survey and answer generation on top of a [`CompletionProvider`].

use serde::de::{DeserializeOwned, Error as _};
use surveyseed_core::{
  answers::{AnswerBatch, is_respondent_id},
  store::{self, BlobStore},
  survey::SurveyDocument,
};

use crate::{
  GenerationError, Result,
  catalogue::PromptCatalogue,
  prompts::{SYSTEM_PROMPT, Schemas, answer_prompt, survey_prompt},
  provider::CompletionProvider,
};

/// Artifact ids touched by [`Generator::generate_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
  pub surveys: Vec<String>,
  pub answers: Vec<String>,
  /// `(id, reason)` for every item that was not written.
  pub skipped: Vec<(String, String)>,
}

pub struct Generator<'p, P> {
  provider: &'p P,
  schemas:  Schemas,
}

impl<'p, P: CompletionProvider> Generator<'p, P> {
  pub fn new(provider: &'p P, schemas: Schemas) -> Self {
    Self { provider, schemas }
  }

  /// Ask the model for a survey serving `goal`. A survey without questions
  /// is malformed.
  pub async fn generate_survey(&self, goal: &str) -> Result<SurveyDocument> {
    let doc: SurveyDocument = self.complete_json(&survey_prompt(goal, &self.schemas)).await?;
    if doc.survey.questions.is_empty() {
      return Err(malformed("survey has no questions"));
    }
    Ok(doc)
  }

  /// Ask the model for `respondents` answer sets to `survey`.
  pub async fn generate_answers(
    &self,
    survey: &SurveyDocument,
    respondents: usize,
  ) -> Result<AnswerBatch> {
    let prompt = answer_prompt(survey, &self.schemas, respondents)?;
    let batch: AnswerBatch = self.complete_json(&prompt).await?;
    if let Some(key) = batch.keys().find(|k| !is_respondent_id(k)) {
      return Err(malformed(format!("{key:?} is not a respondent id")));
    }
    Ok(batch)
  }

  /// Generate a survey for every catalogue entry, then `respondents` answer
  /// sets for every survey found in `store`. A failed item is logged and
  /// reported; the run continues. Storage errors abort.
  pub async fn generate_all<S: BlobStore>(
    &self,
    store: &S,
    respondents: usize,
  ) -> Result<GenerationReport> {
    let catalogue = PromptCatalogue::load(store).await?;
    let surveys = store::surveys(store);
    let answers = store::answers(store);
    let mut report = GenerationReport::default();

    tracing::info!(count = catalogue.surveys.len(), "generating surveys");
    for entry in &catalogue.surveys {
      match self.generate_survey(&entry.prompt).await {
        Ok(doc) => {
          surveys.put(&entry.id, &doc).await?;
          tracing::info!(survey = %entry.id, name = %doc.survey.name, "survey written");
          report.surveys.push(entry.id.clone());
        }
        Err(e) => {
          tracing::warn!(survey = %entry.id, error = %e, "survey generation failed");
          report.skipped.push((entry.id.clone(), e.to_string()));
        }
      }
    }

    tracing::info!(respondents, "generating answers");
    for entry in &catalogue.surveys {
      let doc = match surveys.get(&entry.id).await {
        Ok(Some(doc)) => doc,
        Ok(None) => {
          tracing::warn!(survey = %entry.id, "no survey generated, skipping answers");
          continue;
        }
        Err(surveyseed_core::Error::Serialization(e)) => {
          tracing::warn!(survey = %entry.id, error = %e, "stored survey is not valid");
          report.skipped.push((entry.id.clone(), e.to_string()));
          continue;
        }
        Err(e) => return Err(e.into()),
      };

      match self.generate_answers(&doc, respondents).await {
        Ok(batch) => {
          answers.put(&entry.id, &batch).await?;
          tracing::info!(survey = %entry.id, respondents = batch.len(), "answers written");
          report.answers.push(entry.id.clone());
        }
        Err(e) => {
          tracing::warn!(survey = %entry.id, error = %e, "answer generation failed");
          report.skipped.push((entry.id.clone(), e.to_string()));
        }
      }
    }

    Ok(report)
  }

  async fn complete_json<T: DeserializeOwned>(&self, prompt: &str) -> Result<T> {
    let raw = self
      .provider
      .complete(SYSTEM_PROMPT, prompt)
      .await
      .map_err(GenerationError::provider)?;
    serde_json::from_str(&raw).map_err(GenerationError::MalformedJson)
  }
}

fn malformed(reason: impl std::fmt::Display) -> GenerationError {
  GenerationError::MalformedJson(serde_json::Error::custom(reason))
}
