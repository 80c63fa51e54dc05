//! Rule evaluation and ranking
//!
//! Pure functions over the loaded rule set and a final answer map.

use crate::ruleset::{AnswerValue, ExpectedValue, Rule, RuleResult, RuleSet, Urgency};
use serde::Serialize;
use std::collections::HashMap;

/// Upper bound on returned suggestions. Keeps the output a bounded,
/// predictable size however generously the rule set is authored.
pub const MAX_SUGGESTIONS: usize = 3;

/// A ranked recommendation produced from the final answer set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub urgency: Urgency,
    pub title: String,
    pub description: String,
    pub reasoning: String,
    pub action_text: String,
    /// `None` when this is the fallback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_rule_id: Option<String>,
}

impl Suggestion {
    fn from_rule(rule: &Rule) -> Self {
        Self {
            urgency: rule.result.urgency,
            title: rule.result.title.clone(),
            description: rule.result.description.clone(),
            reasoning: rule.result.reasoning.clone(),
            action_text: rule.result.action_text.clone(),
            source_rule_id: Some(rule.id.clone()),
        }
    }

    fn fallback(result: &RuleResult) -> Self {
        Self {
            urgency: result.urgency,
            title: result.title.clone(),
            description: result.description.clone(),
            reasoning: result.reasoning.clone(),
            action_text: result.action_text.clone(),
            source_rule_id: None,
        }
    }
}

/// Evaluate every rule against the final answers.
///
/// Fully satisfied rules are ranked `high` before `medium` before `low`;
/// the sort is stable, so rule definition order breaks ties. The list is
/// capped at [`MAX_SUGGESTIONS`]. When nothing matches, the fallback is
/// returned alone, so the result always has 1 to 3 entries.
pub fn evaluate(ruleset: &RuleSet, answers: &HashMap<String, AnswerValue>) -> Vec<Suggestion> {
    let mut matched: Vec<&Rule> = ruleset
        .rules
        .iter()
        .filter(|rule| rule_matches(rule, answers))
        .collect();

    matched.sort_by(|a, b| b.result.urgency.cmp(&a.result.urgency));
    matched.truncate(MAX_SUGGESTIONS);

    if matched.is_empty() {
        return vec![Suggestion::fallback(&ruleset.fallback)];
    }

    matched.into_iter().map(Suggestion::from_rule).collect()
}

/// AND across a rule's conditions. A question the user never reached is
/// skipped rather than failing the rule: rules reference only a subset of
/// questions, and the dialogue branch taken may not visit all of them.
fn rule_matches(rule: &Rule, answers: &HashMap<String, AnswerValue>) -> bool {
    rule.conditions.iter().all(|(question_id, expected)| {
        answers
            .get(question_id)
            .map_or(true, |answer| condition_matches(expected, answer))
    })
}

/// The 2x2 matching table over expected/answer shapes
fn condition_matches(expected: &ExpectedValue, answer: &AnswerValue) -> bool {
    match (expected, answer) {
        (ExpectedValue::Single(e), AnswerValue::Scalar(a)) => e == a,
        (ExpectedValue::Single(e), AnswerValue::Set(a)) => a.contains(e),
        (ExpectedValue::Many(e), AnswerValue::Scalar(a)) => e.contains(a),
        (ExpectedValue::Many(e), AnswerValue::Set(a)) => e.iter().any(|v| a.contains(v)),
    }
}
