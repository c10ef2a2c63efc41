//! Forward-chaining engine
//!
//! [`InferenceRulesEngine`] keeps firing until the facts stop triggering
//! any rule. Each cycle selects the rules whose conditions currently hold
//! and fires only those, in priority order, through a
//! [`DefaultRulesEngine`] sharing the same parameters and rule listeners.
//! A rule whose action does not change the facts it depends on triggers
//! again on the next cycle, so such rule sets need a cycle bound.

use std::sync::Arc;

use rulekit_core::Facts;
use tracing::{debug, warn};

use crate::engine::{DefaultRulesEngine, EngineBase, RulesEngine};
use crate::listener::{RuleListener, RulesEngineListener};
use crate::parameters::EngineParameters;
use crate::report::FiringReport;
use crate::rule::Rule;
use crate::rules::Rules;

/// Engine that fires candidate rules until no rule is triggered
#[derive(Clone, Default)]
pub struct InferenceRulesEngine {
    base: EngineBase,
    delegate: DefaultRulesEngine,
    max_cycles: Option<usize>,
}

impl InferenceRulesEngine {
    /// Create an engine with default parameters and no cycle bound
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given parameters
    pub fn with_parameters(parameters: EngineParameters) -> Self {
        Self {
            base: EngineBase::new(parameters),
            delegate: DefaultRulesEngine::with_parameters(parameters),
            max_cycles: None,
        }
    }

    /// Stop after this many cycles even if rules still trigger
    pub fn with_max_cycles(mut self, max_cycles: usize) -> Self {
        self.max_cycles = Some(max_cycles);
        self
    }

    pub fn with_rule_listener(mut self, listener: Arc<dyn RuleListener>) -> Self {
        self.register_rule_listener(listener);
        self
    }

    pub fn with_engine_listener(mut self, listener: Arc<dyn RulesEngineListener>) -> Self {
        self.register_engine_listener(listener);
        self
    }

    /// Register a rule listener. It is notified for every rule of every cycle.
    pub fn register_rule_listener(&mut self, listener: Arc<dyn RuleListener>) {
        self.base.register_rule_listener(Arc::clone(&listener));
        self.delegate.register_rule_listener(listener);
    }

    /// Register an engine listener. It is notified once per `fire`, not per cycle.
    pub fn register_engine_listener(&mut self, listener: Arc<dyn RulesEngineListener>) {
        self.base.register_engine_listener(listener);
    }

    pub fn max_cycles(&self) -> Option<usize> {
        self.max_cycles
    }

    fn select_candidates(&self, rules: &Rules, facts: &Facts) -> Rules {
        let mut candidates = Rules::new();
        for rule in rules.iter() {
            match rule.evaluate(facts) {
                Ok(true) => {
                    // Names were validated when `rules` was built.
                    if let Err(err) = candidates.register_shared(Arc::clone(rule)) {
                        warn!(rule = %rule.name(), error = %err, "Could not select candidate rule");
                    }
                }
                Ok(false) => {}
                Err(err) => {
                    debug!(
                        rule = %rule.name(),
                        error = %err,
                        "Rule evaluated with error while selecting candidates"
                    );
                }
            }
        }
        candidates
    }
}

impl RulesEngine for InferenceRulesEngine {
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

        let mut report = FiringReport::new();
        loop {
            let candidates = self.select_candidates(rules, facts);
            if candidates.is_empty() {
                break;
            }

            if let Some(max) = self.max_cycles.filter(|max| report.cycles() >= *max) {
                warn!(
                    max_cycles = max,
                    candidates = ?candidates.names(),
                    "Inference stopped at the cycle limit"
                );
                break;
            }

            debug!(
                cycle = report.cycles() + 1,
                candidates = ?candidates.names(),
                "Firing candidate rules"
            );
            report.absorb(self.delegate.fire(&candidates, facts));
        }

        self.base.after_rules(rules, facts);
        report
    }

    fn check(&self, rules: &Rules, facts: &Facts) -> Vec<(Arc<dyn Rule>, bool)> {
        self.base.before_rules(rules, facts);
        let result = self.delegate.do_check(rules, facts);
        self.base.after_rules(rules, facts);
        result
    }
}
