//! Request bodies of the Formbricks management API.
//!
//! Only the subset of the Formbricks survey model that the mappers produce is
//! modelled. Field names follow the API (`camelCase`); enum-like string
//! constants are closed Rust enums so a typo cannot reach the wire.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use surveyseed_core::{operator::Operator, survey::QuestionType};

// ─── Survey ──────────────────────────────────────────────────────────────────

/// Body of `POST /api/v1/management/surveys`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyPayload {
  pub name:           String,
  #[serde(rename = "type")]
  pub kind:           SurveyKind,
  pub status:         SurveyStatus,
  pub environment_id: String,
  pub blocks:         Vec<Block>,
  /// Legacy flat question list; still required by the API, always empty.
  pub questions:      Vec<Value>,
  pub endings:        Vec<Value>,
  pub hidden_fields:  HiddenFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SurveyKind {
  Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SurveyStatus {
  InProgress,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenFields {
  pub enabled:   bool,
  pub field_ids: Vec<String>,
}

// ─── Blocks ──────────────────────────────────────────────────────────────────

/// One page of the survey: a single question element and the jumps that
/// leave it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
  pub id:       String,
  pub name:     String,
  #[serde(rename = "type")]
  pub kind:     BlockKind,
  pub elements: Vec<Element>,
  /// Omitted entirely, not sent as `[]`, when the block has no rules.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub logic:    Vec<LogicRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
  Question,
}

/// A question as Formbricks renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
  pub id:       String,
  #[serde(rename = "type")]
  pub kind:     ElementType,
  pub required: bool,
  pub headline: LocalizedText,
  #[serde(flatten)]
  pub rating:   Option<RatingScale>,
  #[serde(flatten)]
  pub text:     Option<TextInput>,
  /// Options of a `multipleChoiceSingle` / `multipleChoiceMulti` element.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub choices:  Option<Vec<Choice>>,
}

/// One selectable option of a choice element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
  pub id:    String,
  pub label: LocalizedText,
}

/// Formbricks element type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ElementType(String);

impl ElementType {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&QuestionType> for ElementType {
  fn from(kind: &QuestionType) -> Self {
    let name = match kind {
      QuestionType::Rating => "rating",
      QuestionType::OpenText => "openText",
      QuestionType::SingleChoice => "multipleChoiceSingle",
      QuestionType::MultipleChoice => "multipleChoiceMulti",
      QuestionType::Other(other) => other,
    };
    Self(name.to_owned())
  }
}

/// Text with per-language variants; only `default` is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedText {
  pub default: String,
}

impl LocalizedText {
  pub fn new(text: impl Into<String>) -> Self {
    Self { default: text.into() }
  }
}

/// Extra fields of a `rating` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingScale {
  pub range:                   u32,
  pub scale:                   RatingStyle,
  pub is_color_coding_enabled: bool,
  pub lower_label:             LocalizedText,
  pub upper_label:             LocalizedText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RatingStyle {
  Star,
}

/// Extra fields of an `openText` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextInput {
  pub input_type:  InputType,
  pub placeholder: LocalizedText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InputType {
  Text,
}

// ─── Logic ───────────────────────────────────────────────────────────────────

/// "If the condition group holds, run the actions."
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicRule {
  pub id:         String,
  pub conditions: ConditionGroup,
  pub actions:    Vec<LogicAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionGroup {
  pub id:         String,
  pub connector:  Connector,
  pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Connector {
  And,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
  pub id:            String,
  pub operator:      LogicOperator,
  pub left_operand:  Operand,
  pub right_operand: Operand,
}

/// Formbricks' name for a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicOperator {
  IsLessThanOrEqual,
  IsLessThan,
  IsGreaterThan,
  IsGreaterThanOrEqual,
  Equals,
  NotEquals,
}

impl From<Operator> for LogicOperator {
  fn from(op: Operator) -> Self {
    match op {
      Operator::LessThanOrEqual => Self::IsLessThanOrEqual,
      Operator::LessThan => Self::IsLessThan,
      Operator::GreaterThan => Self::IsGreaterThan,
      Operator::GreaterThanOrEqual => Self::IsGreaterThanOrEqual,
      Operator::Equal => Self::Equals,
      Operator::NotEqual => Self::NotEquals,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operand {
  #[serde(rename = "type")]
  pub kind:  OperandKind,
  pub value: Value,
}

impl Operand {
  /// The answer given to element `element_id`.
  pub fn element(element_id: &str) -> Self {
    Self { kind: OperandKind::Element, value: Value::String(element_id.to_owned()) }
  }

  /// A literal value.
  pub fn fixed(value: Value) -> Self {
    Self { kind: OperandKind::Static, value }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OperandKind {
  Element,
  Static,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicAction {
  pub id:        String,
  pub objective: ActionObjective,
  /// Id of the block to jump to.
  pub target:    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionObjective {
  JumpToBlock,
}

// ─── Responses ───────────────────────────────────────────────────────────────

/// Body of `POST /api/v1/management/responses`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePayload {
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
  pub finished:       bool,
  pub language:       String,
  pub survey_id:      String,
  pub environment_id: String,
  /// `question_id -> answer value`.
  pub data:           Map<String, Value>,
}
