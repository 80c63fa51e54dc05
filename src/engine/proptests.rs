//! Property-based tests for the rule evaluator
//!
//! These verify the bounded-output and ranking invariants across arbitrary
//! rule sets and answer maps.

use super::*;
use crate::ruleset::{
    AnswerType, AnswerValue, ExpectedValue, Question, Rule, RuleResult, RuleSet, Urgency,
};
use proptest::prelude::*;
use std::collections::HashMap;

// ============================================================================
// Arbitrary Generators
// ============================================================================

// A small value alphabet so matches actually occur.
fn arb_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("yes".to_string()),
        Just("no".to_string()),
        Just("cough".to_string()),
        Just("rash".to_string()),
    ]
}

fn arb_question_id() -> impl Strategy<Value = String> {
    (0..4u8).prop_map(|n| format!("q{n}"))
}

fn arb_urgency() -> impl Strategy<Value = Urgency> {
    prop_oneof![
        Just(Urgency::Low),
        Just(Urgency::Medium),
        Just(Urgency::High),
    ]
}

fn arb_answer_value() -> impl Strategy<Value = AnswerValue> {
    prop_oneof![
        arb_value().prop_map(AnswerValue::Scalar),
        proptest::collection::vec(arb_value(), 1..3).prop_map(AnswerValue::Set),
    ]
}

fn arb_expected_value() -> impl Strategy<Value = ExpectedValue> {
    prop_oneof![
        arb_value().prop_map(ExpectedValue::Single),
        proptest::collection::vec(arb_value(), 1..3).prop_map(ExpectedValue::Many),
    ]
}

fn arb_conditions() -> impl Strategy<Value = HashMap<String, ExpectedValue>> {
    proptest::collection::hash_map(arb_question_id(), arb_expected_value(), 0..3)
}

fn arb_answers() -> impl Strategy<Value = HashMap<String, AnswerValue>> {
    proptest::collection::hash_map(arb_question_id(), arb_answer_value(), 0..4)
}

fn arb_ruleset() -> impl Strategy<Value = RuleSet> {
    proptest::collection::vec((arb_conditions(), arb_urgency()), 0..8).prop_map(|specs| {
        let rules = specs
            .into_iter()
            .enumerate()
            .map(|(index, (conditions, urgency))| Rule {
                id: format!("r{index}"),
                conditions,
                result: RuleResult {
                    urgency,
                    title: format!("r{index}"),
                    description: String::new(),
                    reasoning: String::new(),
                    action_text: String::new(),
                },
            })
            .collect();

        RuleSet {
            entry: "q0".to_string(),
            questions: (0..4u8)
                .map(|n| Question {
                    id: format!("q{n}"),
                    prompt: String::new(),
                    answer_type: AnswerType::SingleChoice,
                    options: vec![],
                    successors: HashMap::new(),
                    default_successor: None,
                })
                .collect(),
            rules,
            fallback: RuleResult {
                urgency: Urgency::Low,
                title: "fallback".to_string(),
                description: String::new(),
                reasoning: String::new(),
                action_text: String::new(),
            },
        }
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// The output always has between 1 and MAX_SUGGESTIONS entries.
    #[test]
    fn output_is_bounded(ruleset in arb_ruleset(), answers in arb_answers()) {
        let suggestions = evaluate(&ruleset, &answers);
        prop_assert!(!suggestions.is_empty());
        prop_assert!(suggestions.len() <= MAX_SUGGESTIONS);
    }

    /// Evaluation is deterministic for fixed inputs.
    #[test]
    fn evaluation_is_deterministic(ruleset in arb_ruleset(), answers in arb_answers()) {
        prop_assert_eq!(evaluate(&ruleset, &answers), evaluate(&ruleset, &answers));
    }

    /// Urgencies never increase down the ranked list.
    #[test]
    fn urgencies_are_non_increasing(ruleset in arb_ruleset(), answers in arb_answers()) {
        let suggestions = evaluate(&ruleset, &answers);
        for pair in suggestions.windows(2) {
            prop_assert!(pair[0].urgency >= pair[1].urgency);
        }
    }

    /// The fallback only ever appears alone.
    #[test]
    fn fallback_appears_alone(ruleset in arb_ruleset(), answers in arb_answers()) {
        let suggestions = evaluate(&ruleset, &answers);
        if suggestions.iter().any(|s| s.source_rule_id.is_none()) {
            prop_assert_eq!(suggestions.len(), 1);
            prop_assert_eq!(&suggestions[0].title, "fallback");
        }
    }

    /// Every non-fallback suggestion traces back to a defined rule.
    #[test]
    fn suggestions_come_from_defined_rules(ruleset in arb_ruleset(), answers in arb_answers()) {
        let suggestions = evaluate(&ruleset, &answers);
        for suggestion in &suggestions {
            if let Some(source) = &suggestion.source_rule_id {
                prop_assert!(ruleset.rules.iter().any(|r| &r.id == source));
            }
        }
    }

    /// A rule whose conditions reference only unanswered questions matches
    /// (satisfied-by-absence), so an empty answer map matches every rule.
    #[test]
    fn empty_answers_match_every_rule(ruleset in arb_ruleset()) {
        let suggestions = evaluate(&ruleset, &HashMap::new());
        if ruleset.rules.is_empty() {
            prop_assert!(suggestions[0].source_rule_id.is_none());
        } else {
            prop_assert_eq!(suggestions.len(), ruleset.rules.len().min(MAX_SUGGESTIONS));
        }
    }
}
