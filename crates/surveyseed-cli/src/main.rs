//! `surveyseed`: stand up Formbricks and fill it with synthetic surveys.
//!
//! # Usage
//!
//! ```text
//! surveyseed formbricks up         # docker compose up -d
//! surveyseed formbricks generate   # LLM → surveys/ and answers/
//! surveyseed formbricks seed       # upload to the management API
//! surveyseed formbricks down
//! ```
//!
//! Settings come from `cli.env`, an optional `surveyseed.toml`, and the
//! environment; see [`settings`].

mod compose;
mod settings;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use compose::Compose;
use settings::Settings;
use surveyseed_formbricks::{ApiConfig, FormbricksClient, Seeder, precondition};
use surveyseed_llm::{Generator, OpenAiConfig, OpenAiProvider, Schemas};
use surveyseed_store_fs::FsStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "surveyseed", version, about = "Seed Formbricks with LLM-generated surveys")]
struct Cli {
  /// Env file merged into the environment before settings are read.
  #[arg(long, global = true, value_name = "FILE", default_value = "cli.env")]
  env_file: PathBuf,

  /// Working directory holding artifacts, templates and the env file.
  #[arg(long, global = true, value_name = "DIR", default_value = ".")]
  dir: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Manage a local Formbricks instance and its data.
  Formbricks {
    #[command(subcommand)]
    action: Action,
  },
}

#[derive(Subcommand, Debug)]
enum Action {
  /// Start Formbricks with docker compose.
  Up,
  /// Stop Formbricks.
  Down,
  /// Generate surveys and answers with the language model.
  Generate {
    /// Answer sets per survey (default: `respondents` setting).
    #[arg(short = 'n', long)]
    respondents: Option<usize>,
  },
  /// Upload generated surveys and answers.
  Seed {
    #[arg(long, value_enum, default_value_t = Phase::All)]
    phase: Phase,
  },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
  /// Surveys, then answers.
  All,
  Surveys,
  Answers,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.dir, &cli.env_file)?;

  let Command::Formbricks { action } = cli.command;
  match action {
    Action::Up => Compose::new(&cli.dir, settings.docker_sudo).up().await,
    Action::Down => Compose::new(&cli.dir, settings.docker_sudo).down().await,
    Action::Generate { respondents } => {
      generate(&settings, FsStore::new(&cli.dir), respondents).await
    }
    Action::Seed { phase } => seed(&settings, FsStore::new(&cli.dir), phase).await,
  }
}

async fn generate(settings: &Settings, store: FsStore, respondents: Option<usize>) -> Result<()> {
  let Some(api_key) = settings.open_ai_key.clone().filter(|k| !k.trim().is_empty()) else {
    tracing::warn!("no OPEN_AI_KEY configured, nothing generated");
    return Ok(());
  };

  let provider = OpenAiProvider::new(OpenAiConfig {
    base_url: settings.openai_base_url.clone(),
    api_key,
    model: settings.openai_model.clone(),
    timeout: settings.completion_timeout(),
  })
  .context("failed to build completion client")?;
  let schemas = Schemas::load(&store).await.context("failed to load schemas")?;

  let respondents = respondents.unwrap_or(settings.respondents);
  let report = Generator::new(&provider, schemas)
    .generate_all(&store, respondents)
    .await
    .context("generation failed")?;

  tracing::info!(
    surveys = report.surveys.len(),
    answers = report.answers.len(),
    skipped = report.skipped.len(),
    "generation finished"
  );
  Ok(())
}

async fn seed(settings: &Settings, store: FsStore, phase: Phase) -> Result<()> {
  let credentials = match precondition::can_proceed(
    settings.environment_id.as_deref(),
    settings.api_key.as_deref(),
    &store,
  )
  .await
  {
    Ok(credentials) => credentials,
    Err(reason) => {
      tracing::warn!(%reason, "not seeding");
      return Ok(());
    }
  };

  let client = FormbricksClient::new(ApiConfig {
    host:    settings.formbricks_host.clone(),
    api_key: credentials.api_key.to_owned(),
    timeout: settings.request_timeout(),
  })
  .context("failed to build Formbricks client")?;
  let mut seeder = Seeder::new(&store, &client, credentials.environment_id);

  match phase {
    Phase::All => {
      let report = seeder.seed().await.context("seeding failed")?;
      let (created, failed) = report.response_counts();
      tracing::info!(
        surveys = report.surveys.created().count(),
        failed_surveys = report.surveys.failed().count(),
        responses = created,
        failed_responses = failed,
        "seeding finished"
      );
    }
    Phase::Surveys => {
      let table = seeder.seed_surveys().await.context("survey upload failed")?;
      tracing::info!(surveys = table.created().count(), "surveys uploaded");
    }
    Phase::Answers => {
      let outcomes = seeder.seed_answers().await.context("answer upload failed")?;
      tracing::info!(surveys = outcomes.len(), "answers uploaded");
    }
  }
  Ok(())
}
