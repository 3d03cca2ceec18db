//! Prompt templates and the JSON schemas embedded in them.
//!
//! Templates carry `<< name >>` placeholders that are filled by plain
//! substitution. Schemas ship with the crate and can be overridden per
//! working directory by dropping a file at [`QUESTION_SCHEMA_KEY`] or
//! [`ANSWER_SCHEMA_KEY`].

use serde_json::Value;
use surveyseed_core::{
  store::{BlobStore, read_json},
  survey::SurveyDocument,
};

use crate::{GenerationError, Result};

/// System message sent with every completion.
pub const SYSTEM_PROMPT: &str = "You output ONLY valid JSON. No explanations.";

pub const QUESTION_SCHEMA_KEY: &str = "schemas/question_schema.json";
pub const ANSWER_SCHEMA_KEY: &str = "schemas/answer_schema.json";

const BUNDLED_QUESTION_SCHEMA: &str = include_str!("../schemas/question_schema.json");
const BUNDLED_ANSWER_SCHEMA: &str = include_str!("../schemas/answer_schema.json");

const SURVEY_TEMPLATE: &str = "\
You are generating a survey definition.

Rules:
- Output MUST be valid JSON
- Do NOT add explanations
- Do NOT invent platform-specific fields
- Use short stable question IDs: q1, q2, q3
- Include conditional logic if appropriate
- Define the type of question

Survey goal:
<< survey_goal >>

Question types allowed:
- rating (1-5 stars)
- openText
- single choice
- multiple choice

JSON schema:
<< schema >>
";

const ANSWER_TEMPLATE: &str = "\
You are generating synthetic survey responses.

STRICT RULES:
- Output MUST be valid JSON
- Output MUST match the provided answer schema exactly
- Do NOT include explanations, comments, or markdown
- Do NOT add fields not defined in the schema
- All responses must respect survey logic and visibility rules
- Check the logic and only provide the answers of the relevant questions
- Only answer questions that would be shown to the user

INPUT 1 - Survey Definition (JSON):
<< survey_json >>

INPUT 2 - Answer Schema (JSON):
<< answer_schema_json >>

TASK:
Generate realistic responses for << N >> different users.

CONSTRAINTS:
- Rating values must be within the allowed range
- Text answers must be realistic and varied
- If a question is conditionally visible, include it ONLY when its condition is met
- Do NOT generate answers for hidden questions
- Use stable user IDs: user_001, user_002, ...

OUTPUT:
Return ONLY a JSON object that conforms to the answer schema.
";

/// The two schemas the model is asked to follow.
#[derive(Debug, Clone, PartialEq)]
pub struct Schemas {
  pub question: Value,
  pub answer:   Value,
}

impl Schemas {
  /// The schemas compiled into the crate.
  pub fn bundled() -> Result<Self> {
    let parse = |raw: &str| serde_json::from_str(raw).map_err(GenerationError::MalformedJson);
    Ok(Self {
      question: parse(BUNDLED_QUESTION_SCHEMA)?,
      answer:   parse(BUNDLED_ANSWER_SCHEMA)?,
    })
  }

  /// Bundled schemas, each replaced by its override in `store` if present.
  pub async fn load<S: BlobStore>(store: &S) -> Result<Self> {
    let mut schemas = Self::bundled()?;
    if let Some(question) = read_json(store, QUESTION_SCHEMA_KEY).await? {
      tracing::info!(key = QUESTION_SCHEMA_KEY, "using question schema override");
      schemas.question = question;
    }
    if let Some(answer) = read_json(store, ANSWER_SCHEMA_KEY).await? {
      tracing::info!(key = ANSWER_SCHEMA_KEY, "using answer schema override");
      schemas.answer = answer;
    }
    Ok(schemas)
  }
}

/// User message asking for a survey that serves `goal`.
pub fn survey_prompt(goal: &str, schemas: &Schemas) -> String {
  SURVEY_TEMPLATE
    .replace("<< schema >>", &schemas.question.to_string())
    .replace("<< survey_goal >>", goal)
}

/// User message asking for `respondents` answer sets to `survey`.
pub fn answer_prompt(survey: &SurveyDocument, schemas: &Schemas, respondents: usize) -> Result<String> {
  let survey_json = serde_json::to_string(survey).map_err(surveyseed_core::Error::from)?;
  Ok(
    ANSWER_TEMPLATE
      .replace("<< answer_schema_json >>", &schemas.answer.to_string())
      .replace("<< survey_json >>", &survey_json)
      .replace("<< N >>", &respondents.to_string()),
  )
}
