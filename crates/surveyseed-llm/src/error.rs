//! Error types for `surveyseed-llm`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
  #[error("completion failed: {0}")]
  Provider(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("model returned malformed JSON: {0}")]
  MalformedJson(#[source] serde_json::Error),

  #[error("no prompt catalogue at {0}")]
  MissingCatalogue(&'static str),

  #[error("core error: {0}")]
  Core(#[from] surveyseed_core::Error),
}

impl GenerationError {
  /// Box a provider error into [`GenerationError::Provider`].
  pub fn provider<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Provider(Box::new(err))
  }
}

pub type Result<T, E = GenerationError> = std::result::Result<T, E>;
