//! Observation hooks around rule evaluation and execution
//!
//! Every method has a no-op default, so listeners only implement the
//! callbacks they care about. Listeners observe; apart from the veto in
//! [`RuleListener::before_evaluate`] they cannot influence a firing.

use rulekit_core::{Error, Facts};

use crate::rule::Rule;
use crate::rules::Rules;

/// Hooks invoked around each rule of a firing
pub trait RuleListener: Send + Sync {
    /// Called before a rule is evaluated.
    ///
    /// Returning `false` vetoes the rule: it is neither evaluated nor
    /// executed, and the firing moves on to the next rule.
    fn before_evaluate(&self, _rule: &dyn Rule, _facts: &Facts) -> bool {
        true
    }

    /// Called after a rule was evaluated without error
    fn after_evaluate(&self, _rule: &dyn Rule, _facts: &Facts, _triggered: bool) {}

    /// Called when a rule's condition returned an error
    fn on_evaluation_error(&self, _rule: &dyn Rule, _facts: &Facts, _error: &Error) {}

    /// Called before a triggered rule's action runs
    fn before_execute(&self, _rule: &dyn Rule, _facts: &Facts) {}

    /// Called after a rule's action succeeded
    fn on_success(&self, _rule: &dyn Rule, _facts: &Facts) {}

    /// Called after a rule's action failed
    fn on_failure(&self, _rule: &dyn Rule, _facts: &Facts, _error: &Error) {}
}

/// Hooks invoked around a whole firing (or check)
pub trait RulesEngineListener: Send + Sync {
    /// Called before any rule is considered
    fn before_rules(&self, _rules: &Rules, _facts: &Facts) {}

    /// Called after the last rule was considered, including after an early stop
    fn after_rules(&self, _rules: &Rules, _facts: &Facts) {}
}
