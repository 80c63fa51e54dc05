//! Question graph lookup and successor resolution
//!
//! A pure lookup structure over the loaded rule set. Acyclicity is a
//! requirement on the asset, not something checked at runtime.

use crate::ruleset::{AnswerValue, Question, RuleSet};
use std::collections::HashMap;

/// Where the dialogue goes after an answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    Continue(String),
    Terminal,
}

/// Immutable map of question id -> definition, built once from the rule set
#[derive(Debug)]
pub struct QuestionGraph {
    questions: HashMap<String, Question>,
}

impl QuestionGraph {
    pub fn new(ruleset: &RuleSet) -> Self {
        let questions = ruleset
            .questions
            .iter()
            .map(|q| (q.id.clone(), q.clone()))
            .collect();
        Self { questions }
    }

    pub fn lookup(&self, id: &str) -> Option<&Question> {
        self.questions.get(id)
    }

    /// Resolve the edge taken for `answer`.
    ///
    /// A scalar answer must equal a successor key exactly. For a set
    /// answer, the first element (in submitted order) with an edge wins.
    /// When nothing matches, the default successor applies; a question with
    /// neither routes to terminal.
    pub fn resolve_next(question: &Question, answer: &AnswerValue) -> NextStep {
        let matched = match answer {
            AnswerValue::Scalar(value) => question.successors.get(value),
            AnswerValue::Set(values) => {
                values.iter().find_map(|value| question.successors.get(value))
            }
        };

        match matched.or(question.default_successor.as_ref()) {
            Some(next) => NextStep::Continue(next.clone()),
            None => NextStep::Terminal,
        }
    }
}
