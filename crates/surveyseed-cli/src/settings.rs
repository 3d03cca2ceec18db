//! Run-time settings.
//!
//! Sources, lowest precedence first: built-in defaults, `surveyseed.toml` in
//! the working directory, then the process environment. The env file
//! (`cli.env` by default) is merged into the environment before any of this
//! is read, without overriding variables that are already set.

use std::{path::Path, time::Duration};

use anyhow::Context as _;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Name of the optional settings file inside the working directory.
pub const SETTINGS_FILE: &str = "surveyseed.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  pub open_ai_key:             Option<String>,
  pub openai_base_url:         String,
  pub openai_model:            String,
  pub formbricks_host:         String,
  pub environment_id:          Option<String>,
  pub api_key:                 Option<String>,
  pub respondents:             usize,
  pub request_timeout_secs:    u64,
  pub completion_timeout_secs: u64,
  pub docker_sudo:             bool,
}

impl Settings {
  /// Load the env file (if it exists), then every settings source.
  pub fn load(dir: &Path, env_file: &Path) -> anyhow::Result<Self> {
    let env_file = dir.join(env_file);
    match dotenvy::from_path(&env_file) {
      Ok(()) => tracing::debug!(path = %env_file.display(), "loaded env file"),
      Err(e) if e.not_found() => {
        tracing::debug!(path = %env_file.display(), "no env file");
      }
      Err(e) => {
        return Err(e).with_context(|| format!("failed to read {}", env_file.display()));
      }
    }
    Self::build(dir, Environment::default()).context("failed to load settings")
  }

  fn build(dir: &Path, env: Environment) -> Result<Self, ConfigError> {
    Config::builder()
      .set_default("openai_base_url", surveyseed_llm::provider::DEFAULT_BASE_URL)?
      .set_default("openai_model", surveyseed_llm::provider::DEFAULT_MODEL)?
      .set_default("formbricks_host", "http://localhost:3000")?
      .set_default("respondents", 5)?
      .set_default("request_timeout_secs", 30)?
      .set_default("completion_timeout_secs", 120)?
      .set_default("docker_sudo", false)?
      .add_source(File::from(dir.join(SETTINGS_FILE)).required(false))
      .add_source(env)
      .build()?
      .try_deserialize()
  }

  pub fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }

  pub fn completion_timeout(&self) -> Duration {
    Duration::from_secs(self.completion_timeout_secs)
  }
}
