//! Artifact naming on durable storage.
//!
//! Surveys live at `surveys/survey_{id}.json` and answer sets at
//! `answers/answers_{id}.json`. The id embedded in the file name is the join
//! key between the two; [`parse_artifact_id`] is the only place that knows
//! how to recover it.

/// The two kinds of generated artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
  Survey,
  Answers,
}

impl ArtifactKind {
  /// Directory the artifacts of this kind live in.
  pub fn dir(self) -> &'static str {
    match self {
      Self::Survey => "surveys",
      Self::Answers => "answers",
    }
  }

  /// File-name prefix preceding the id.
  pub fn prefix(self) -> &'static str {
    match self {
      Self::Survey => "survey_",
      Self::Answers => "answers_",
    }
  }
}

const EXTENSION: &str = ".json";

/// File name for the artifact `id`, e.g. `survey_3.json`.
pub fn artifact_file_name(kind: ArtifactKind, id: &str) -> String {
  format!("{}{id}{EXTENSION}", kind.prefix())
}

/// Storage key for the artifact `id`, e.g. `surveys/survey_3.json`.
pub fn artifact_key(kind: ArtifactKind, id: &str) -> String {
  format!("{}/{}", kind.dir(), artifact_file_name(kind, id))
}

/// Recover the id from an artifact file name or path.
///
/// Only the final path component is considered. Returns `None` when the name
/// does not carry the kind's prefix, lacks the `.json` extension, or the id
/// between them is empty.
pub fn parse_artifact_id(kind: ArtifactKind, name: &str) -> Option<String> {
  let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
  let id = file.strip_prefix(kind.prefix())?.strip_suffix(EXTENSION)?;
  (!id.is_empty()).then(|| id.to_owned())
}
