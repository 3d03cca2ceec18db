//! Survey definition → Formbricks block graph.
//!
//! Every question becomes one block. Block ids are minted for all questions
//! before any logic is built, so a rule may jump forward to a question that
//! has not been mapped yet. A rule's `go_to` question id is rewritten into
//! the id of the block that wraps that question. Choice options get their
//! ids after the rules of their question.

use std::collections::HashMap;

use surveyseed_core::{
  ids::IdGenerator,
  operator::Operator,
  survey::{ConditionalRule, Question, QuestionType, SurveyDocument},
};

use crate::{
  error::MapError,
  payload::{
    ActionObjective, Block, BlockKind, Choice, Condition, ConditionGroup, Connector, Element,
    ElementType, HiddenFields, InputType, LocalizedText, LogicAction, LogicOperator,
    LogicRule, Operand, RatingScale, RatingStyle, SurveyKind, SurveyPayload, SurveyStatus,
    TextInput,
  },
};

/// Label under the lowest rating.
pub const LOWER_LABEL: &str = "Not satisfied";
/// Label under the highest rating.
pub const UPPER_LABEL: &str = "Very satisfied";

/// Map one survey into the payload for `POST /management/surveys`.
///
/// Every id in the output comes from `ids`, so a deterministic generator
/// yields deterministic output.
pub fn map_survey<G>(
  doc: &SurveyDocument,
  environment_id: &str,
  ids: &mut G,
) -> Result<SurveyPayload, MapError>
where
  G: IdGenerator + ?Sized,
{
  let questions = &doc.survey.questions;

  let mut block_ids: HashMap<&str, String> = HashMap::with_capacity(questions.len());
  for q in questions {
    if block_ids.insert(&q.question_id, ids.next_id()).is_some() {
      return Err(MapError::DuplicateQuestion(q.question_id.clone()));
    }
  }

  let mut blocks = Vec::with_capacity(questions.len());
  for q in questions {
    let logic = q
      .logic
      .conditions
      .iter()
      .map(|rule| map_rule(q, rule, &block_ids, &mut *ids))
      .collect::<Result<Vec<_>, _>>()?;

    blocks.push(Block {
      id: block_ids[q.question_id.as_str()].clone(),
      name: format!("Block for {}", q.question_id),
      kind: BlockKind::Question,
      elements: vec![map_element(q, &mut *ids)?],
      logic,
    });
  }

  Ok(SurveyPayload {
    name: doc.survey.name.clone(),
    kind: SurveyKind::Link,
    status: SurveyStatus::InProgress,
    environment_id: environment_id.to_owned(),
    blocks,
    questions: Vec::new(),
    endings: Vec::new(),
    hidden_fields: HiddenFields::default(),
  })
}

fn map_element<G>(q: &Question, ids: &mut G) -> Result<Element, MapError>
where
  G: IdGenerator + ?Sized,
{
  let rating = match q.question_type {
    QuestionType::Rating => {
      let scale = q
        .config
        .rating
        .as_ref()
        .ok_or_else(|| MapError::MissingRatingScale(q.question_id.clone()))?;
      Some(RatingScale {
        range:                   scale.max_value,
        scale:                   RatingStyle::Star,
        is_color_coding_enabled: false,
        lower_label:             LocalizedText::new(LOWER_LABEL),
        upper_label:             LocalizedText::new(UPPER_LABEL),
      })
    }
    _ => None,
  };

  let text = match q.question_type {
    QuestionType::OpenText => Some(TextInput {
      input_type:  InputType::Text,
      placeholder: LocalizedText::new(
        q.config
          .text
          .as_ref()
          .and_then(|t| t.placeholder.clone())
          .unwrap_or_default(),
      ),
    }),
    _ => None,
  };

  let choices = match q.question_type {
    QuestionType::SingleChoice | QuestionType::MultipleChoice => {
      if q.config.choices.is_empty() {
        return Err(MapError::MissingChoices(q.question_id.clone()));
      }
      let options = q
        .config
        .choices
        .iter()
        .map(|label| Choice { id: ids.next_id(), label: LocalizedText::new(label.clone()) })
        .collect();
      Some(options)
    }
    _ => None,
  };

  Ok(Element {
    id: q.question_id.clone(),
    kind: ElementType::from(&q.question_type),
    required: q.logic.required,
    headline: LocalizedText::new(q.question_text.clone()),
    rating,
    text,
    choices,
  })
}

fn map_rule<G>(
  q: &Question,
  rule: &ConditionalRule,
  block_ids: &HashMap<&str, String>,
  ids: &mut G,
) -> Result<LogicRule, MapError>
where
  G: IdGenerator + ?Sized,
{
  let clause = &rule.when;
  let operator = Operator::parse(&clause.operator).map_err(|_| MapError::UnknownOperator {
    question: q.question_id.clone(),
    operator: clause.operator.clone(),
  })?;
  let target = block_ids
    .get(clause.go_to.as_str())
    .ok_or_else(|| MapError::UnknownJumpTarget {
      question: q.question_id.clone(),
      target:   clause.go_to.clone(),
    })?
    .clone();

  Ok(LogicRule {
    id:         ids.next_id(),
    conditions: ConditionGroup {
      id:         ids.next_id(),
      connector:  Connector::And,
      conditions: vec![Condition {
        id:            ids.next_id(),
        operator:      LogicOperator::from(operator),
        left_operand:  Operand::element(&q.question_id),
        right_operand: Operand::fixed(clause.value.clone()),
      }],
    },
    actions:    vec![LogicAction {
      id:        ids.next_id(),
      objective: ActionObjective::JumpToBlock,
      target,
    }],
  })
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use serde_json::{Value, json};
  use surveyseed_core::ids::{RandomIds, SequentialIds};

  use super::*;

  fn doc(value: Value) -> SurveyDocument {
    serde_json::from_value(value).expect("valid survey document")
  }

  fn rating_then_text() -> SurveyDocument {
    doc(json!({
      "survey": {
        "name": "Support follow-up",
        "questions": [
          {
            "question_id": "q1",
            "question_type": "rating",
            "question_text": "How satisfied are you?",
            "config": { "rating": { "max_value": 5 } },
            "logic": {
              "required": true,
              "conditions": [
                { "if": { "operator": "<=", "value": 2, "go_to": "q2" } }
              ]
            }
          },
          {
            "question_id": "q2",
            "question_type": "openText",
            "question_text": "What could we do better?",
            "config": { "text": { "placeholder": "Your thoughts" } },
            "logic": { "required": false }
          }
        ]
      }
    }))
  }

  fn with_operator(op: &str) -> SurveyDocument {
    doc(json!({
      "survey": {
        "name": "ops",
        "questions": [
          {
            "question_id": "q1",
            "question_type": "rating",
            "question_text": "Score",
            "config": { "rating": { "max_value": 10 } },
            "logic": { "conditions": [ { "if": { "operator": op, "value": 5, "go_to": "q1" } } ] }
          }
        ]
      }
    }))
  }

  #[test]
  fn low_rating_jumps_to_follow_up() {
    let mut ids = SequentialIds::new("id");
    let payload = map_survey(&rating_then_text(), "env-1", &mut ids).unwrap();

    assert_eq!(payload.blocks.len(), 2);
    let (b1, b2) = (&payload.blocks[0], &payload.blocks[1]);
    assert_eq!(b1.elements[0].id, "q1");
    assert_eq!(b2.elements[0].id, "q2");

    assert_eq!(b1.logic.len(), 1);
    let rule = &b1.logic[0];
    let cond = &rule.conditions.conditions[0];
    assert_eq!(cond.operator, LogicOperator::IsLessThanOrEqual);
    assert_eq!(cond.left_operand, Operand::element("q1"));
    assert_eq!(cond.right_operand.value, json!(2));
    assert_eq!(rule.actions[0].target, b2.id);
    assert!(b2.logic.is_empty());
  }

  #[test]
  fn payload_shape_on_the_wire() {
    let mut ids = SequentialIds::new("id");
    let payload = map_survey(&rating_then_text(), "env-1", &mut ids).unwrap();
    let wire = serde_json::to_value(&payload).unwrap();

    assert_eq!(wire["name"], "Support follow-up");
    assert_eq!(wire["type"], "link");
    assert_eq!(wire["status"], "inProgress");
    assert_eq!(wire["environmentId"], "env-1");
    assert_eq!(wire["questions"], json!([]));
    assert_eq!(wire["endings"], json!([]));
    assert_eq!(wire["hiddenFields"], json!({ "enabled": false, "fieldIds": [] }));

    assert_eq!(
      wire["blocks"][0],
      json!({
        "id": "id0001",
        "name": "Block for q1",
        "type": "question",
        "elements": [{
          "id": "q1",
          "type": "rating",
          "required": true,
          "headline": { "default": "How satisfied are you?" },
          "range": 5,
          "scale": "star",
          "isColorCodingEnabled": false,
          "lowerLabel": { "default": "Not satisfied" },
          "upperLabel": { "default": "Very satisfied" }
        }],
        "logic": [{
          "id": "id0003",
          "conditions": {
            "id": "id0004",
            "connector": "and",
            "conditions": [{
              "id": "id0005",
              "operator": "isLessThanOrEqual",
              "leftOperand": { "type": "element", "value": "q1" },
              "rightOperand": { "type": "static", "value": 2 }
            }]
          },
          "actions": [{ "id": "id0006", "objective": "jumpToBlock", "target": "id0002" }]
        }]
      })
    );

    let text = &wire["blocks"][1]["elements"][0];
    assert_eq!(text["inputType"], "text");
    assert_eq!(text["placeholder"], json!({ "default": "Your thoughts" }));
  }

  #[test]
  fn blocks_without_rules_have_no_logic_key() {
    let survey = doc(json!({
      "survey": {
        "name": "plain",
        "questions": [
          { "question_id": "q1", "question_type": "openText", "question_text": "Hi?" },
          { "question_id": "q2", "question_type": "single choice", "question_text": "Pick",
            "config": { "choices": ["Yes", "No"] },
            "logic": { "required": true, "conditions": [] } }
        ]
      }
    }));
    let payload = map_survey(&survey, "env", &mut RandomIds).unwrap();
    let wire = serde_json::to_value(&payload).unwrap();

    for block in wire["blocks"].as_array().unwrap() {
      assert!(block.get("logic").is_none(), "{block}");
    }
    assert_eq!(wire["blocks"][0]["elements"][0]["placeholder"], json!({ "default": "" }));
    assert_eq!(wire["blocks"][1]["elements"][0]["type"], "multipleChoiceSingle");
  }

  #[test]
  fn every_question_gets_exactly_one_block() {
    let payload = map_survey(&rating_then_text(), "env", &mut RandomIds).unwrap();
    let block_ids: HashSet<&str> = payload.blocks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(block_ids.len(), 2);

    for block in &payload.blocks {
      assert_eq!(block.elements.len(), 1);
      for rule in &block.logic {
        for action in &rule.actions {
          assert!(block_ids.contains(action.target.as_str()), "dangling jump");
        }
      }
    }
  }

  #[test]
  fn forward_and_backward_jumps_resolve() {
    let survey = doc(json!({
      "survey": {
        "name": "loops",
        "questions": [
          { "question_id": "a", "question_type": "rating", "question_text": "A",
            "config": { "rating": { "max_value": 3 } },
            "logic": { "conditions": [ { "if": { "operator": ">", "value": 1, "go_to": "c" } } ] } },
          { "question_id": "b", "question_type": "openText", "question_text": "B" },
          { "question_id": "c", "question_type": "rating", "question_text": "C",
            "config": { "rating": { "max_value": 3 } },
            "logic": { "conditions": [ { "if": { "operator": "==", "value": 3, "go_to": "a" } } ] } }
        ]
      }
    }));
    let payload = map_survey(&survey, "env", &mut RandomIds).unwrap();
    let [a, _, c] = &payload.blocks[..] else { panic!("expected three blocks") };
    assert_eq!(a.logic[0].actions[0].target, c.id);
    assert_eq!(c.logic[0].actions[0].target, a.id);
  }

  #[test]
  fn each_operator_maps_to_its_formbricks_name() {
    let cases = [
      ("<=", LogicOperator::IsLessThanOrEqual),
      ("<", LogicOperator::IsLessThan),
      (">", LogicOperator::IsGreaterThan),
      (">=", LogicOperator::IsGreaterThanOrEqual),
      ("==", LogicOperator::Equals),
      ("!=", LogicOperator::NotEquals),
    ];
    for (symbol, expected) in cases {
      let payload = map_survey(&with_operator(symbol), "env", &mut RandomIds).unwrap();
      assert_eq!(payload.blocks[0].logic[0].conditions.conditions[0].operator, expected);
    }
  }

  #[test]
  fn unknown_operator_fails_mapping() {
    let err = map_survey(&with_operator("~="), "env", &mut RandomIds).unwrap_err();
    assert_eq!(
      err,
      MapError::UnknownOperator { question: "q1".into(), operator: "~=".into() }
    );
  }

  #[test]
  fn dangling_jump_fails_mapping() {
    let survey = doc(json!({
      "survey": {
        "name": "broken",
        "questions": [
          { "question_id": "q1", "question_type": "rating", "question_text": "?",
            "config": { "rating": { "max_value": 5 } },
            "logic": { "conditions": [ { "if": { "operator": "<", "value": 3, "go_to": "q9" } } ] } }
        ]
      }
    }));
    assert_eq!(
      map_survey(&survey, "env", &mut RandomIds).unwrap_err(),
      MapError::UnknownJumpTarget { question: "q1".into(), target: "q9".into() }
    );
  }

  #[test]
  fn duplicate_question_ids_fail_mapping() {
    let survey = doc(json!({
      "survey": {
        "name": "dupes",
        "questions": [
          { "question_id": "q1", "question_type": "openText", "question_text": "one" },
          { "question_id": "q1", "question_type": "openText", "question_text": "two" }
        ]
      }
    }));
    assert_eq!(
      map_survey(&survey, "env", &mut RandomIds).unwrap_err(),
      MapError::DuplicateQuestion("q1".into())
    );
  }

  #[test]
  fn rating_without_scale_fails_mapping() {
    let survey = doc(json!({
      "survey": {
        "name": "no scale",
        "questions": [ { "question_id": "q1", "question_type": "rating", "question_text": "?" } ]
      }
    }));
    assert_eq!(
      map_survey(&survey, "env", &mut RandomIds).unwrap_err(),
      MapError::MissingRatingScale("q1".into())
    );
  }

  #[test]
  fn choice_options_on_the_wire() {
    let survey = doc(json!({
      "survey": {
        "name": "colours",
        "questions": [
          { "question_id": "q1", "question_type": "singleChoice", "question_text": "Pick",
            "config": { "choices": ["Red", "Blue"] } },
          { "question_id": "q2", "question_type": "multipleChoice", "question_text": "All that apply",
            "config": { "choices": ["Fast", "Cheap", "Good"] } }
        ]
      }
    }));
    let payload = map_survey(&survey, "env", &mut SequentialIds::new("id")).unwrap();
    let wire = serde_json::to_value(&payload).unwrap();

    assert_eq!(
      wire["blocks"][0]["elements"][0],
      json!({
        "id": "q1",
        "type": "multipleChoiceSingle",
        "required": false,
        "headline": { "default": "Pick" },
        "choices": [
          { "id": "id0003", "label": { "default": "Red" } },
          { "id": "id0004", "label": { "default": "Blue" } }
        ]
      })
    );
    let multi = &wire["blocks"][1]["elements"][0];
    assert_eq!(multi["type"], "multipleChoiceMulti");
    assert_eq!(multi["choices"].as_array().unwrap().len(), 3);
    assert_eq!(multi["choices"][2], json!({ "id": "id0007", "label": { "default": "Good" } }));
  }

  #[test]
  fn choice_question_without_options_fails_mapping() {
    let survey = doc(json!({
      "survey": {
        "name": "empty",
        "questions": [ { "question_id": "q1", "question_type": "singleChoice", "question_text": "?" } ]
      }
    }));
    assert_eq!(
      map_survey(&survey, "env", &mut RandomIds).unwrap_err(),
      MapError::MissingChoices("q1".into())
    );
  }

  #[test]
  fn remapping_keeps_shape_but_not_ids() {
    let survey = rating_then_text();
    let first = map_survey(&survey, "env", &mut RandomIds).unwrap();
    let second = map_survey(&survey, "env", &mut RandomIds).unwrap();

    assert_eq!(first.blocks.len(), second.blocks.len());
    for (a, b) in first.blocks.iter().zip(&second.blocks) {
      assert_eq!(a.elements, b.elements);
      assert_eq!(a.logic.len(), b.logic.len());
      assert_ne!(a.id, b.id);
    }
  }

  #[test]
  fn sequential_ids_make_mapping_deterministic() {
    let survey = rating_then_text();
    let first = map_survey(&survey, "env", &mut SequentialIds::new("x")).unwrap();
    let second = map_survey(&survey, "env", &mut SequentialIds::new("x")).unwrap();
    assert_eq!(first, second);
  }
}
