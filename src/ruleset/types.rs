//! Rule set data types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Whether a question accepts one option or several
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnswerType {
    #[default]
    SingleChoice,
    MultiChoice,
}

impl AnswerType {
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerType::SingleChoice => "single_choice",
            AnswerType::MultiChoice => "multi_choice",
        }
    }
}

/// A user's answer: a bare string for single-choice questions, an array
/// for multi-choice. Untagged so the wire form stays the plain JSON the
/// asset and callers already use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Scalar(String),
    Set(Vec<String>),
}

impl AnswerValue {
    /// Check the value's shape against a question's declared answer type
    pub fn matches_type(&self, answer_type: AnswerType) -> bool {
        matches!(
            (self, answer_type),
            (AnswerValue::Scalar(_), AnswerType::SingleChoice)
                | (AnswerValue::Set(_), AnswerType::MultiChoice)
        )
    }
}

/// What a rule condition expects; `Many` is OR across its values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpectedValue {
    Single(String),
    Many(Vec<String>),
}

/// Ordinal severity tag. Ranking relies on the derived order:
/// `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// One node of the question graph; immutable once loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub answer_type: AnswerType,
    #[serde(default)]
    pub options: Vec<String>,
    /// Answer value -> next question id
    #[serde(default)]
    pub successors: HashMap<String, String>,
    /// Taken when no successor key matches; `None` routes to terminal
    #[serde(default)]
    pub default_successor: Option<String>,
}

/// The suggestion content a rule (or the fallback) produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleResult {
    pub urgency: Urgency,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub action_text: String,
}

/// A condition set over answers paired with a suggestion result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub conditions: HashMap<String, ExpectedValue>,
    pub result: RuleResult,
}

/// The full declarative asset: questions, rules, and the fallback
/// suggestion returned when no rule matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    /// Entry question id. The loader fills this in with the first
    /// question's id when the asset leaves it out.
    #[serde(default)]
    pub entry: String,
    pub questions: Vec<Question>,
    pub rules: Vec<Rule>,
    pub fallback: RuleResult,
}
