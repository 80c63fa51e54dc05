//! One-shot rule asset loading and validation
//!
//! Cross-validates every successor and condition reference at load time so
//! a dangling question id surfaces as a startup failure, never mid-dialogue.

use super::types::RuleSet;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuleSetError {
    #[error("failed to read rule asset: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed rule asset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("rule asset defines no questions")]
    NoQuestions,
    #[error("duplicate question id: {0}")]
    DuplicateQuestion(String),
    #[error("entry question not found: {0}")]
    UnknownEntry(String),
    #[error("question {question} routes to unknown question: {successor}")]
    UnknownSuccessor { question: String, successor: String },
    #[error("rule {rule} references unknown question: {question}")]
    UnknownConditionQuestion { rule: String, question: String },
}

pub type RuleSetResult<T> = Result<T, RuleSetError>;

impl RuleSet {
    /// Load the rule asset from disk. Called once at startup; any error
    /// here is fatal to the process.
    pub fn load<P: AsRef<Path>>(path: P) -> RuleSetResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse and validate an asset already in memory
    pub fn from_json(raw: &str) -> RuleSetResult<Self> {
        let mut ruleset: RuleSet = serde_json::from_str(raw)?;
        ruleset.validate()?;
        Ok(ruleset)
    }

    fn validate(&mut self) -> RuleSetResult<()> {
        if self.questions.is_empty() {
            return Err(RuleSetError::NoQuestions);
        }
        if self.entry.is_empty() {
            self.entry = self.questions[0].id.clone();
        }

        let mut ids: HashSet<&str> = HashSet::new();
        for question in &self.questions {
            if !ids.insert(question.id.as_str()) {
                return Err(RuleSetError::DuplicateQuestion(question.id.clone()));
            }
        }

        if !ids.contains(self.entry.as_str()) {
            return Err(RuleSetError::UnknownEntry(self.entry.clone()));
        }

        for question in &self.questions {
            let successors = question
                .successors
                .values()
                .chain(question.default_successor.as_ref());
            for successor in successors {
                if !ids.contains(successor.as_str()) {
                    return Err(RuleSetError::UnknownSuccessor {
                        question: question.id.clone(),
                        successor: successor.clone(),
                    });
                }
            }
        }

        for rule in &self.rules {
            for question in rule.conditions.keys() {
                if !ids.contains(question.as_str()) {
                    return Err(RuleSetError::UnknownConditionQuestion {
                        rule: rule.id.clone(),
                        question: question.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID_ASSET: &str = r#"{
        "questions": [
            {
                "id": "fever_check",
                "prompt": "Do you have a fever?",
                "options": ["yes", "no"],
                "successors": { "yes": "duration" }
            },
            {
                "id": "duration",
                "prompt": "How long have you felt unwell?",
                "options": ["under_day", "days", "week_plus"]
            }
        ],
        "rules": [
            {
                "id": "prolonged_fever",
                "conditions": { "fever_check": "yes", "duration": ["days", "week_plus"] },
                "result": {
                    "urgency": "high",
                    "title": "Seek care",
                    "description": "A prolonged fever should be examined.",
                    "reasoning": "Fever lasting multiple days.",
                    "action_text": "Contact your doctor today."
                }
            }
        ],
        "fallback": { "urgency": "low", "title": "Monitor" }
    }"#;

    #[test]
    fn parses_valid_asset() {
        let ruleset = RuleSet::from_json(VALID_ASSET).unwrap();
        assert_eq!(ruleset.questions.len(), 2);
        assert_eq!(ruleset.rules.len(), 1);
        assert_eq!(ruleset.fallback.title, "Monitor");
    }

    #[test]
    fn entry_defaults_to_first_question() {
        let ruleset = RuleSet::from_json(VALID_ASSET).unwrap();
        assert_eq!(ruleset.entry, "fever_check");
    }

    #[test]
    fn explicit_entry_is_kept() {
        let raw = VALID_ASSET.replacen('{', r#"{ "entry": "duration", "#, 1);
        let ruleset = RuleSet::from_json(&raw).unwrap();
        assert_eq!(ruleset.entry, "duration");
    }

    #[test]
    fn unknown_entry_is_rejected() {
        let raw = VALID_ASSET.replacen('{', r#"{ "entry": "nope", "#, 1);
        assert!(matches!(
            RuleSet::from_json(&raw),
            Err(RuleSetError::UnknownEntry(id)) if id == "nope"
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID_ASSET.as_bytes()).unwrap();
        let ruleset = RuleSet::load(file.path()).unwrap();
        assert_eq!(ruleset.entry, "fever_check");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(matches!(
            RuleSet::load("/nonexistent/ruleset.json"),
            Err(RuleSetError::Io(_))
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            RuleSet::from_json("{ not json"),
            Err(RuleSetError::Parse(_))
        ));
    }

    #[test]
    fn empty_question_list_is_rejected() {
        let raw = r#"{ "questions": [], "rules": [], "fallback": { "urgency": "low", "title": "Monitor" } }"#;
        assert!(matches!(
            RuleSet::from_json(raw),
            Err(RuleSetError::NoQuestions)
        ));
    }

    #[test]
    fn duplicate_question_id_is_rejected() {
        let raw = VALID_ASSET.replace(r#""id": "duration""#, r#""id": "fever_check""#);
        assert!(matches!(
            RuleSet::from_json(&raw),
            Err(RuleSetError::DuplicateQuestion(id)) if id == "fever_check"
        ));
    }

    #[test]
    fn dangling_successor_is_rejected() {
        let raw = VALID_ASSET.replace(r#""yes": "duration""#, r#""yes": "missing_q""#);
        assert!(matches!(
            RuleSet::from_json(&raw),
            Err(RuleSetError::UnknownSuccessor { successor, .. }) if successor == "missing_q"
        ));
    }

    #[test]
    fn dangling_default_successor_is_rejected() {
        let raw = VALID_ASSET.replace(
            r#""options": ["under_day", "days", "week_plus"]"#,
            r#""options": ["under_day", "days", "week_plus"], "default_successor": "missing_q""#,
        );
        assert!(matches!(
            RuleSet::from_json(&raw),
            Err(RuleSetError::UnknownSuccessor { successor, .. }) if successor == "missing_q"
        ));
    }

    #[test]
    fn rule_condition_on_unknown_question_is_rejected() {
        let raw = VALID_ASSET.replace(r#""fever_check": "yes""#, r#""mystery": "yes""#);
        assert!(matches!(
            RuleSet::from_json(&raw),
            Err(RuleSetError::UnknownConditionQuestion { question, .. }) if question == "mystery"
        ));
    }
}
