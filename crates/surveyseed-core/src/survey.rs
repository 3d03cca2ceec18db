//! Survey definitions as authored by the generator.
//!
//! This is the platform-neutral shape described by the question schema. It
//! is read from `surveys/survey_{id}.json` and never mutated; the Formbricks
//! crate maps it into the block graph the survey application expects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─── Document ────────────────────────────────────────────────────────────────

/// Top-level shape of a survey artifact: `{"survey": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyDocument {
  pub survey: Survey,
}

/// A named, ordered list of questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Survey {
  pub name:      String,
  pub questions: Vec<Question>,
}

impl Survey {
  /// Look up a question by its short id.
  pub fn question(&self, question_id: &str) -> Option<&Question> {
    self.questions.iter().find(|q| q.question_id == question_id)
  }
}

// ─── Question ────────────────────────────────────────────────────────────────

/// One question of a survey.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
  /// Short stable id such as `q1`; unique within the survey.
  pub question_id:   String,
  pub question_type: QuestionType,
  pub question_text: String,
  #[serde(default)]
  pub config:        QuestionConfig,
  #[serde(default)]
  pub logic:         QuestionLogic,
}

/// The kind of a question.
///
/// Parsing is lenient: the generator is free-form text behind a schema, so
/// spellings like `"single choice"` or `"open_text"` are folded into the
/// matching variant. Anything unrecognised is kept verbatim in
/// [`QuestionType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionType {
  Rating,
  OpenText,
  SingleChoice,
  MultipleChoice,
  Other(String),
}

impl QuestionType {
  /// Canonical artifact spelling.
  pub fn as_str(&self) -> &str {
    match self {
      Self::Rating => "rating",
      Self::OpenText => "openText",
      Self::SingleChoice => "singleChoice",
      Self::MultipleChoice => "multipleChoice",
      Self::Other(s) => s,
    }
  }
}

impl From<String> for QuestionType {
  fn from(raw: String) -> Self {
    let folded: String = raw
      .chars()
      .filter(|c| !matches!(c, ' ' | '_' | '-'))
      .flat_map(char::to_lowercase)
      .collect();
    match folded.as_str() {
      "rating" => Self::Rating,
      "opentext" | "text" => Self::OpenText,
      "singlechoice" | "multiplechoicesingle" => Self::SingleChoice,
      "multiplechoice" | "multiplechoicemulti" => Self::MultipleChoice,
      _ => Self::Other(raw),
    }
  }
}

impl From<QuestionType> for String {
  fn from(kind: QuestionType) -> Self {
    match kind {
      QuestionType::Other(s) => s,
      known => known.as_str().to_owned(),
    }
  }
}

// ─── Config ──────────────────────────────────────────────────────────────────

/// Type-specific configuration. Keys other than `rating`, `text` and
/// `choices` are kept so that a survey written back to disk loses nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionConfig {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rating:  Option<RatingConfig>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub text:    Option<TextConfig>,
  /// Option labels of a single- or multiple-choice question, in order.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub choices: Vec<String>,
  #[serde(flatten)]
  pub extra:   Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingConfig {
  pub max_value: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min_value: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextConfig {
  #[serde(default, alias = "placholder", skip_serializing_if = "Option::is_none")]
  pub placeholder: Option<String>,
}

// ─── Logic ───────────────────────────────────────────────────────────────────

/// Whether a question must be answered, plus its conditional jumps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionLogic {
  #[serde(default)]
  pub required:   bool,
  #[serde(default)]
  pub conditions: Vec<ConditionalRule>,
}

/// `{"if": {"operator": "<=", "value": 2, "go_to": "q3"}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionalRule {
  #[serde(rename = "if")]
  pub when: RuleClause,
}

/// If the answer to the owning question satisfies `operator value`, jump to
/// the question `go_to`.
///
/// `operator` stays a string here; it is resolved into
/// [`crate::operator::Operator`] when the survey is mapped, so an unknown
/// operator is a mapping failure rather than a load failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleClause {
  pub operator: String,
  pub value:    Value,
  pub go_to:    String,
}
