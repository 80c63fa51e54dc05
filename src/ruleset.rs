//! Declarative question/rule asset
//!
//! Loaded once at process start and read-only afterwards. Every other
//! component assumes a fully validated rule set, so the loader fails fast
//! instead of serving in a degraded mode.

mod loader;
mod types;

pub use loader::{RuleSetError, RuleSetResult};
pub use types::{
    AnswerType, AnswerValue, ExpectedValue, Question, Rule, RuleResult, RuleSet, Urgency,
};
