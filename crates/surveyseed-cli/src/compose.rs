//! Formbricks container lifecycle through `docker compose`.

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
  process::Stdio,
};

use anyhow::{Context as _, Result, bail};
use tokio::process::Command;

const COMPOSE_TEMPLATE: &str = include_str!("../templates/docker-compose.yml");
const ENV_TEMPLATE: &str = include_str!("../templates/formbricks.env");

/// Files `up` places in the working directory, paired with their template.
const TEMPLATES: [(&str, &str); 2] =
  [("docker-compose.yml", COMPOSE_TEMPLATE), (".env", ENV_TEMPLATE)];

/// Runs `docker` in a working directory, optionally through `sudo`.
#[derive(Debug, Clone)]
pub struct Compose {
  dir:  PathBuf,
  sudo: bool,
}

impl Compose {
  pub fn new(dir: impl Into<PathBuf>, sudo: bool) -> Self {
    Self { dir: dir.into(), sudo }
  }

  /// Check docker, write missing templates, start the stack detached.
  pub async fn up(&self) -> Result<()> {
    self.check_docker().await?;
    for created in setup_files(&self.dir).await? {
      tracing::info!(path = %created.display(), "created from template");
    }
    tracing::info!("starting Formbricks");
    self.docker(&["compose", "up", "-d"]).await
  }

  pub async fn down(&self) -> Result<()> {
    tracing::info!("stopping Formbricks");
    self.docker(&["compose", "down"]).await
  }

  async fn check_docker(&self) -> Result<()> {
    let status = Command::new("docker")
      .arg("--version")
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .status()
      .await;
    match status {
      Ok(s) if s.success() => Ok(()),
      Ok(s) => bail!("`docker --version` exited with {s}"),
      Err(e) if e.kind() == ErrorKind::NotFound => {
        bail!("'docker' not found. Please install it first.")
      }
      Err(e) => Err(e).context("failed to run docker"),
    }
  }

  fn command(&self, args: &[&str]) -> Command {
    let mut cmd = if self.sudo {
      let mut cmd = Command::new("sudo");
      cmd.arg("docker");
      cmd
    } else {
      Command::new("docker")
    };
    cmd.args(args).current_dir(&self.dir);
    cmd
  }

  async fn docker(&self, args: &[&str]) -> Result<()> {
    let status = self
      .command(args)
      .status()
      .await
      .with_context(|| format!("failed to run docker {}", args.join(" ")))?;
    if !status.success() {
      bail!("docker {} exited with {status}", args.join(" "));
    }
    Ok(())
  }
}

/// Copy each bundled template into `dir` unless a file is already there.
/// Returns the paths that were created.
pub async fn setup_files(dir: &Path) -> Result<Vec<PathBuf>> {
  tokio::fs::create_dir_all(dir)
    .await
    .with_context(|| format!("failed to create {}", dir.display()))?;

  let mut created = Vec::new();
  for (name, contents) in TEMPLATES {
    let path = dir.join(name);
    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
      tracing::debug!(path = %path.display(), "keeping existing file");
      continue;
    }
    tokio::fs::write(&path, contents)
      .await
      .with_context(|| format!("failed to write {}", path.display()))?;
    created.push(path);
  }
  Ok(created)
}
