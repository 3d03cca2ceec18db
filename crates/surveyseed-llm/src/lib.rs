//! Language-model generation of surveys and synthetic answers.
//!
//! A [`Generator`] turns a natural-language survey goal into a
//! [`SurveyDocument`](surveyseed_core::survey::SurveyDocument) and a survey
//! into a batch of respondent answers. The model sits behind
//! [`CompletionProvider`]; [`OpenAiProvider`] speaks the OpenAI chat
//! completions API.
//!
//! ```rust,ignore
//! let provider = OpenAiProvider::new(config)?;
//! let schemas = Schemas::load(&store).await?;
//! let report = Generator::new(&provider, schemas).generate_all(&store, 5).await?;
//! ```

// Native `async fn` in traits; `CompletionProvider` spells out its `Send`
// bounds.
#![allow(async_fn_in_trait)]

pub mod catalogue;
pub mod error;
pub mod generator;
pub mod prompts;
pub mod provider;

pub use catalogue::{CATALOGUE_KEY, PromptCatalogue, SurveyPrompt};
pub use error::{GenerationError, Result};
pub use generator::{GenerationReport, Generator};
pub use prompts::Schemas;
pub use provider::{CompletionProvider, OpenAiConfig, OpenAiProvider};
