//! Per-rule outcome log of a firing

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::rule::Rule;

/// What happened to a single rule during a firing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Condition held and the action succeeded
    Applied,

    /// Condition held and the action returned an error
    Failed {
        /// Rendered error message
        error: String,
    },

    /// Condition did not hold, or could not be evaluated
    NotTriggered,

    /// Priority above the threshold; the firing stopped at this rule
    SkippedByThreshold,

    /// A rule listener vetoed the evaluation
    Vetoed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Failed { .. } => "failed",
            Self::NotTriggered => "not_triggered",
            Self::SkippedByThreshold => "skipped_by_threshold",
            Self::Vetoed => "vetoed",
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { error } => write!(f, "failed: {}", error),
            other => f.write_str(other.as_str()),
        }
    }
}

/// A rule paired with its outcome
#[derive(Clone)]
pub struct RuleOutcome {
    rule: Arc<dyn Rule>,
    outcome: Outcome,
}

impl RuleOutcome {
    pub fn new(rule: Arc<dyn Rule>, outcome: Outcome) -> Self {
        Self { rule, outcome }
    }

    pub fn rule(&self) -> &Arc<dyn Rule> {
        &self.rule
    }

    pub fn rule_name(&self) -> &str {
        self.rule.name()
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }
}

impl fmt::Debug for RuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleOutcome")
            .field("rule", &self.rule.name())
            .field("priority", &self.rule.priority())
            .field("outcome", &self.outcome)
            .finish()
    }
}

/// Outcome counts of a firing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub applied: usize,
    pub failed: usize,
    pub not_triggered: usize,
    pub skipped_by_threshold: usize,
    pub vetoed: usize,
}

impl ReportSummary {
    /// Number of rules whose condition was evaluated
    pub fn evaluated(&self) -> usize {
        self.applied + self.failed + self.not_triggered
    }
}

/// Ordered log of what a firing did with each rule it reached.
///
/// Rules never reached (after an early stop) do not appear.
#[derive(Debug, Clone, Default)]
pub struct FiringReport {
    entries: Vec<RuleOutcome>,
    cycles: usize,
}

impl FiringReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, rule: &Arc<dyn Rule>, outcome: Outcome) {
        self.entries.push(RuleOutcome::new(Arc::clone(rule), outcome));
    }

    pub(crate) fn absorb(&mut self, other: FiringReport) {
        self.entries.extend(other.entries);
        self.cycles += 1;
    }

    /// All entries, in evaluation order
    pub fn entries(&self) -> &[RuleOutcome] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RuleOutcome> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inference cycles that fed this report (zero for a single pass)
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    /// `(rule name, outcome)` pairs in evaluation order
    pub fn outcomes(&self) -> Vec<(&str, &Outcome)> {
        self.entries
            .iter()
            .map(|entry| (entry.rule_name(), entry.outcome()))
            .collect()
    }

    /// Last outcome recorded for the named rule
    pub fn outcome_of(&self, name: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.rule_name() == name)
            .map(RuleOutcome::outcome)
    }

    /// Names of applied rules, in order
    pub fn applied(&self) -> Vec<&str> {
        self.names_where(Outcome::is_applied)
    }

    /// Names of failed rules, in order
    pub fn failed(&self) -> Vec<&str> {
        self.names_where(Outcome::is_failed)
    }

    fn names_where(&self, predicate: impl Fn(&Outcome) -> bool) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| predicate(entry.outcome()))
            .map(RuleOutcome::rule_name)
            .collect()
    }

    /// Count outcomes by kind
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for entry in &self.entries {
            match entry.outcome() {
                Outcome::Applied => summary.applied += 1,
                Outcome::Failed { .. } => summary.failed += 1,
                Outcome::NotTriggered => summary.not_triggered += 1,
                Outcome::SkippedByThreshold => summary.skipped_by_threshold += 1,
                Outcome::Vetoed => summary.vetoed += 1,
            }
        }
        summary
    }
}

impl<'a> IntoIterator for &'a FiringReport {
    type Item = &'a RuleOutcome;
    type IntoIter = std::slice::Iter<'a, RuleOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
