//! Firing metrics
//!
//! [`MetricsListener`] counts what happens to rules during firings. Counts
//! are kept locally for [`MetricsListener::snapshot`] and also emitted
//! through the `metrics` facade, so any installed recorder (Prometheus
//! exporter, etc.) picks them up.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rulekit_core::{Error, Facts};
use rulekit_engine::{Rule, RuleListener, Rules, RulesEngineListener};

/// Listener recording firing counters and latency
#[derive(Clone)]
pub struct MetricsListener {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    firings: AtomicU64,
    evaluations: AtomicU64,
    triggered: AtomicU64,
    applied: AtomicU64,
    failed: AtomicU64,
    evaluation_errors: AtomicU64,
    total_latency_us: AtomicU64,
    started: Mutex<Option<Instant>>,
}

impl MetricsListener {
    /// Create a new metrics listener
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                firings: AtomicU64::new(0),
                evaluations: AtomicU64::new(0),
                triggered: AtomicU64::new(0),
                applied: AtomicU64::new(0),
                failed: AtomicU64::new(0),
                evaluation_errors: AtomicU64::new(0),
                total_latency_us: AtomicU64::new(0),
                started: Mutex::new(None),
            }),
        }
    }

    // Vetoed rules never reach evaluation, so they are not counted here.
    fn record_evaluation(&self) {
        self.inner.evaluations.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("rulekit_rules_evaluated_total").increment(1);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            firings: self.inner.firings.load(Ordering::Relaxed),
            evaluations: self.inner.evaluations.load(Ordering::Relaxed),
            triggered: self.inner.triggered.load(Ordering::Relaxed),
            applied: self.inner.applied.load(Ordering::Relaxed),
            failed: self.inner.failed.load(Ordering::Relaxed),
            evaluation_errors: self.inner.evaluation_errors.load(Ordering::Relaxed),
            total_latency_us: self.inner.total_latency_us.load(Ordering::Relaxed),
        }
    }
}

impl Default for MetricsListener {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleListener for MetricsListener {
    fn after_evaluate(&self, _rule: &dyn Rule, _facts: &Facts, triggered: bool) {
        self.record_evaluation();
        if triggered {
            self.inner.triggered.fetch_add(1, Ordering::Relaxed);
            ::metrics::counter!("rulekit_rules_triggered_total").increment(1);
        }
    }

    fn on_evaluation_error(&self, rule: &dyn Rule, _facts: &Facts, _error: &Error) {
        self.record_evaluation();
        self.inner.evaluation_errors.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("rulekit_evaluation_errors_total", "rule" => rule.name().to_string())
            .increment(1);
    }

    fn on_success(&self, rule: &dyn Rule, _facts: &Facts) {
        self.inner.applied.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("rulekit_rules_applied_total", "rule" => rule.name().to_string())
            .increment(1);
    }

    fn on_failure(&self, rule: &dyn Rule, _facts: &Facts, _error: &Error) {
        self.inner.failed.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("rulekit_rules_failed_total", "rule" => rule.name().to_string())
            .increment(1);
    }
}

impl RulesEngineListener for MetricsListener {
    fn before_rules(&self, rules: &Rules, _facts: &Facts) {
        *self.inner.started.lock() = Some(Instant::now());
        ::metrics::gauge!("rulekit_registered_rules").set(rules.len() as f64);
    }

    fn after_rules(&self, _rules: &Rules, _facts: &Facts) {
        self.inner.firings.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("rulekit_firings_total").increment(1);

        if let Some(started) = self.inner.started.lock().take() {
            let elapsed = started.elapsed();
            self.inner
                .total_latency_us
                .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
            ::metrics::histogram!("rulekit_firing_latency_us").record(elapsed.as_micros() as f64);
        }
    }
}

/// Snapshot of current metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub firings: u64,
    pub evaluations: u64,
    pub triggered: u64,
    pub applied: u64,
    pub failed: u64,
    pub evaluation_errors: u64,
    pub total_latency_us: u64,
}

impl MetricsSnapshot {
    /// Average latency per firing
    pub fn avg_latency_us(&self) -> u64 {
        if self.firings == 0 {
            0
        } else {
            self.total_latency_us / self.firings
        }
    }

    /// Share of evaluated rules whose condition held
    pub fn trigger_rate(&self) -> f64 {
        if self.evaluations == 0 {
            0.0
        } else {
            self.triggered as f64 / self.evaluations as f64
        }
    }
}
