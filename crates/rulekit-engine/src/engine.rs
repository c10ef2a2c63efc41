//! Rules engine
//!
//! [`DefaultRulesEngine`] fires rules in ascending `(priority, name)` order.
//! For each rule it asks the rule listeners whether to evaluate it,
//! evaluates the condition, and runs the action when the condition holds.
//! The [`EngineParameters`] decide when a firing stops early:
//! - a rule's priority is above the threshold
//! - the first rule applied / failed / was not triggered, when the
//!   corresponding skip flag is set
//!
//! Engine listeners are notified before the first rule and after the last
//! one, including after an early stop.

use std::sync::Arc;
use std::time::Instant;

use rulekit_core::{Error, Facts};
use tracing::{debug, error, info, warn};

use crate::listener::{RuleListener, RulesEngineListener};
use crate::parameters::EngineParameters;
use crate::report::{FiringReport, Outcome};
use crate::rule::Rule;
use crate::rules::Rules;

/// A rules engine
pub trait RulesEngine {
    /// Copy of the engine parameters
    fn parameters(&self) -> EngineParameters;

    /// Registered rule listeners, in registration order
    fn rule_listeners(&self) -> &[Arc<dyn RuleListener>];

    /// Registered engine listeners, in registration order
    fn engine_listeners(&self) -> &[Arc<dyn RulesEngineListener>];

    /// Fire the rules against the facts
    fn fire(&self, rules: &Rules, facts: &mut Facts) -> FiringReport;

    /// Evaluate every rule without executing any action.
    ///
    /// Vetoed rules are left out; evaluation errors count as `false`.
    fn check(&self, rules: &Rules, facts: &Facts) -> Vec<(Arc<dyn Rule>, bool)>;
}

/// Parameters and listeners shared by engine implementations
#[derive(Clone, Default)]
pub struct EngineBase {
    parameters: EngineParameters,
    rule_listeners: Vec<Arc<dyn RuleListener>>,
    engine_listeners: Vec<Arc<dyn RulesEngineListener>>,
}

impl EngineBase {
    pub fn new(parameters: EngineParameters) -> Self {
        Self {
            parameters,
            rule_listeners: Vec::new(),
            engine_listeners: Vec::new(),
        }
    }

    pub fn parameters(&self) -> EngineParameters {
        self.parameters
    }

    pub fn rule_listeners(&self) -> &[Arc<dyn RuleListener>] {
        &self.rule_listeners
    }

    pub fn engine_listeners(&self) -> &[Arc<dyn RulesEngineListener>] {
        &self.engine_listeners
    }

    pub fn register_rule_listener(&mut self, listener: Arc<dyn RuleListener>) {
        self.rule_listeners.push(listener);
    }

    pub fn register_engine_listener(&mut self, listener: Arc<dyn RulesEngineListener>) {
        self.engine_listeners.push(listener);
    }

    /// All rule listeners agree to evaluate; stops asking at the first veto
    pub(crate) fn should_be_evaluated(&self, rule: &dyn Rule, facts: &Facts) -> bool {
        self.rule_listeners
            .iter()
            .all(|listener| listener.before_evaluate(rule, facts))
    }

    pub(crate) fn after_evaluate(&self, rule: &dyn Rule, facts: &Facts, triggered: bool) {
        for listener in &self.rule_listeners {
            listener.after_evaluate(rule, facts, triggered);
        }
    }

    pub(crate) fn on_evaluation_error(&self, rule: &dyn Rule, facts: &Facts, error: &Error) {
        for listener in &self.rule_listeners {
            listener.on_evaluation_error(rule, facts, error);
        }
    }

    pub(crate) fn before_execute(&self, rule: &dyn Rule, facts: &Facts) {
        for listener in &self.rule_listeners {
            listener.before_execute(rule, facts);
        }
    }

    pub(crate) fn on_success(&self, rule: &dyn Rule, facts: &Facts) {
        for listener in &self.rule_listeners {
            listener.on_success(rule, facts);
        }
    }

    pub(crate) fn on_failure(&self, rule: &dyn Rule, facts: &Facts, error: &Error) {
        for listener in &self.rule_listeners {
            listener.on_failure(rule, facts, error);
        }
    }

    pub(crate) fn before_rules(&self, rules: &Rules, facts: &Facts) {
        for listener in &self.engine_listeners {
            listener.before_rules(rules, facts);
        }
    }

    pub(crate) fn after_rules(&self, rules: &Rules, facts: &Facts) {
        for listener in &self.engine_listeners {
            listener.after_rules(rules, facts);
        }
    }
}

/// Engine that fires rules in priority order, once each
#[derive(Clone, Default)]
pub struct DefaultRulesEngine {
    base: EngineBase,
}

impl DefaultRulesEngine {
    /// Create an engine with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given parameters
    pub fn with_parameters(parameters: EngineParameters) -> Self {
        Self {
            base: EngineBase::new(parameters),
        }
    }

    /// Add a rule listener
    pub fn with_rule_listener(mut self, listener: Arc<dyn RuleListener>) -> Self {
        self.register_rule_listener(listener);
        self
    }

    /// Add an engine listener
    pub fn with_engine_listener(mut self, listener: Arc<dyn RulesEngineListener>) -> Self {
        self.register_engine_listener(listener);
        self
    }

    pub fn register_rule_listener(&mut self, listener: Arc<dyn RuleListener>) {
        self.base.register_rule_listener(listener);
    }

    pub fn register_rule_listeners(
        &mut self,
        listeners: impl IntoIterator<Item = Arc<dyn RuleListener>>,
    ) {
        for listener in listeners {
            self.base.register_rule_listener(listener);
        }
    }

    pub fn register_engine_listener(&mut self, listener: Arc<dyn RulesEngineListener>) {
        self.base.register_engine_listener(listener);
    }

    pub fn register_engine_listeners(
        &mut self,
        listeners: impl IntoIterator<Item = Arc<dyn RulesEngineListener>>,
    ) {
        for listener in listeners {
            self.base.register_engine_listener(listener);
        }
    }

    fn do_fire(&self, rules: &Rules, facts: &mut Facts) -> FiringReport {
        let mut report = FiringReport::new();

        if rules.is_empty() {
            warn!("No rules registered! Nothing to apply");
            return report;
        }

        let parameters = self.base.parameters();
        self.log_engine_state(rules, facts);
        let started = Instant::now();

        for rule in rules.iter() {
            let name = rule.name();
            let priority = rule.priority();

            if priority > parameters.priority_threshold() {
                debug!(
                    rule = %name,
                    priority,
                    threshold = parameters.priority_threshold(),
                    "Rule priority is above the threshold, skipping next rules"
                );
                report.record(rule, Outcome::SkippedByThreshold);
                break;
            }

            if !self.base.should_be_evaluated(rule.as_ref(), facts) {
                debug!(rule = %name, "Rule has been skipped before being evaluated");
                report.record(rule, Outcome::Vetoed);
                continue;
            }

            let triggered = match rule.evaluate(facts) {
                Ok(triggered) => triggered,
                Err(err) => {
                    error!(rule = %name, error = %err, "Rule evaluated with error");
                    self.base.on_evaluation_error(rule.as_ref(), facts, &err);
                    report.record(rule, Outcome::NotTriggered);
                    if parameters.skip_on_first_non_triggered_rule() {
                        debug!(
                            "Skipping next rules, skip_on_first_non_triggered_rule is set"
                        );
                        break;
                    }
                    continue;
                }
            };

            if !triggered {
                debug!(rule = %name, "Rule has been evaluated to false, it has not been executed");
                self.base.after_evaluate(rule.as_ref(), facts, false);
                report.record(rule, Outcome::NotTriggered);
                if parameters.skip_on_first_non_triggered_rule() {
                    debug!(
                        "Skipping next rules, skip_on_first_non_triggered_rule is set"
                    );
                    break;
                }
                continue;
            }

            debug!(rule = %name, "Rule triggered");
            self.base.after_evaluate(rule.as_ref(), facts, true);
            self.base.before_execute(rule.as_ref(), facts);

            match rule.execute(facts) {
                Ok(()) => {
                    debug!(rule = %name, "Rule performed successfully");
                    report.record(rule, Outcome::Applied);
                    self.base.on_success(rule.as_ref(), facts);
                    if parameters.skip_on_first_applied_rule() {
                        debug!(
                            "Skipping next rules, skip_on_first_applied_rule is set"
                        );
                        break;
                    }
                }
                Err(err) => {
                    warn!(rule = %name, error = %err, "Rule performed with error");
                    report.record(
                        rule,
                        Outcome::Failed {
                            error: err.to_string(),
                        },
                    );
                    self.base.on_failure(rule.as_ref(), facts, &err);
                    if parameters.skip_on_first_failed_rule() {
                        debug!(
                            "Skipping next rules, skip_on_first_failed_rule is set"
                        );
                        break;
                    }
                }
            }
        }

        let summary = report.summary();
        info!(
            applied = summary.applied,
            failed = summary.failed,
            not_triggered = summary.not_triggered,
            vetoed = summary.vetoed,
            elapsed_us = started.elapsed().as_micros() as u64,
            "Rules fired"
        );

        report
    }

    pub(crate) fn do_check(&self, rules: &Rules, facts: &Facts) -> Vec<(Arc<dyn Rule>, bool)> {
        info!(rules = rules.len(), "Checking rules");

        let mut result = Vec::with_capacity(rules.len());
        for rule in rules.iter() {
            if !self.base.should_be_evaluated(rule.as_ref(), facts) {
                continue;
            }

            let triggered = match rule.evaluate(facts) {
                Ok(triggered) => triggered,
                Err(err) => {
                    warn!(
                        rule = %rule.name(),
                        error = %err,
                        "Rule evaluated with error during check"
                    );
                    self.base.on_evaluation_error(rule.as_ref(), facts, &err);
                    false
                }
            };
            result.push((Arc::clone(rule), triggered));
        }
        result
    }

    fn log_engine_state(&self, rules: &Rules, facts: &Facts) {
        debug!(parameters = %self.base.parameters(), "Engine parameters");
        for rule in rules.iter() {
            debug!(
                rule = %rule.name(),
                description = %rule.description(),
                priority = rule.priority(),
                "Registered rule"
            );
        }
        debug!(facts = %facts, "Known facts");
    }
}

impl RulesEngine for DefaultRulesEngine {
    fn parameters(&self) -> EngineParameters {
        self.base.parameters()
    }

    fn rule_listeners(&self) -> &[Arc<dyn RuleListener>] {
        self.base.rule_listeners()
    }

    fn engine_listeners(&self) -> &[Arc<dyn RulesEngineListener>] {
        self.base.engine_listeners()
    }

    fn fire(&self, rules: &Rules, facts: &mut Facts) -> FiringReport {
        self.base.before_rules(rules, facts);
        let report = self.do_fire(rules, facts);
        self.base.after_rules(rules, facts);
        report
    }

    fn check(&self, rules: &Rules, facts: &Facts) -> Vec<(Arc<dyn Rule>, bool)> {
        self.base.before_rules(rules, facts);
        let result = self.do_check(rules, facts);
        self.base.after_rules(rules, facts);
        result
    }
}
