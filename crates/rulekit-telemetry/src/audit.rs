//! Hash-chained audit trail of rule firings

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::SystemTime;
use tracing::warn;
use uuid::Uuid;

use rulekit_core::{Error, Facts};
use rulekit_engine::{Rule, RuleListener, Rules, RulesEngineListener};

/// Audit trail with hash-chained events for tamper detection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditTrail {
    events: Vec<AuditEvent>,
    chain_hash: Option<String>,
}

impl AuditTrail {
    /// Create a new audit trail
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event to the audit trail
    pub fn add_event(&mut self, event: AuditEvent) {
        let mut event = event;
        event.previous_hash = self.chain_hash.clone();

        let hash = compute_hash(&event);
        event.hash = Some(hash.clone());

        self.chain_hash = Some(hash);
        self.events.push(event);
    }

    /// Verify the integrity of the audit trail
    pub fn verify(&self) -> bool {
        let mut prev_hash: Option<&String> = None;

        for event in &self.events {
            if event.previous_hash.as_ref() != prev_hash {
                return false;
            }
            if event.hash.as_deref() != Some(compute_hash(event).as_str()) {
                return false;
            }
            prev_hash = event.hash.as_ref();
        }

        true
    }

    /// Get all events
    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    /// Events concerning the given rule
    pub fn events_for<'a>(&'a self, rule: &'a str) -> impl Iterator<Item = &'a AuditEvent> + 'a {
        self.events
            .iter()
            .filter(move |event| event.rule.as_deref() == Some(rule))
    }

    /// Hash of the most recent event
    pub fn head(&self) -> Option<&str> {
        self.chain_hash.as_deref()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Serialize the whole trail as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load a trail from JSON. Call [`AuditTrail::verify`] before trusting it.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

fn compute_hash(event: &AuditEvent) -> String {
    let mut hasher = Sha256::new();

    hasher.update(event.id.as_bytes());
    hasher.update(event.kind.as_str().as_bytes());
    if let Some(ref rule) = event.rule {
        hasher.update(rule.as_bytes());
    }
    if let Some(ref data) = event.data {
        hasher.update(data.as_bytes());
    }
    hasher.update(format!("{:?}", event.timestamp).as_bytes());
    hasher.update(event.severity.as_str().as_bytes());
    if let Some(ref prev) = event.previous_hash {
        hasher.update(prev.as_bytes());
    }

    format!("{:x}", hasher.finalize())
}

/// What an audit event records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    FiringStarted,
    FiringFinished,
    RuleApplied,
    RuleFailed,
    EvaluationFailed,
}

impl AuditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FiringStarted => "firing_started",
            Self::FiringFinished => "firing_finished",
            Self::RuleApplied => "rule_applied",
            Self::RuleFailed => "rule_failed",
            Self::EvaluationFailed => "evaluation_failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditSeverity {
    Info,
    Warning,
    High,
}

impl AuditSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::High => "high",
        }
    }
}

/// A single audit event in the trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event id
    pub id: String,

    pub kind: AuditKind,

    /// Name of the rule concerned, if any
    pub rule: Option<String>,

    /// Event data (JSON serialized)
    pub data: Option<String>,

    pub timestamp: SystemTime,

    /// Hash of this event
    pub hash: Option<String>,

    /// Hash of previous event (for chaining)
    pub previous_hash: Option<String>,

    pub severity: AuditSeverity,
}

impl AuditEvent {
    /// Create a new audit event
    pub fn new(kind: AuditKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            rule: None,
            data: None,
            timestamp: SystemTime::now(),
            hash: None,
            previous_hash: None,
            severity: AuditSeverity::Info,
        }
    }

    /// Set the rule this event concerns
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Set event data
    pub fn with_data(mut self, data: impl Serialize) -> Self {
        self.data = serde_json::to_string(&data).ok();
        self
    }

    pub fn with_severity(mut self, severity: AuditSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// Listener appending firing events to an [`AuditTrail`]
#[derive(Debug, Default)]
pub struct AuditListener {
    trail: Mutex<AuditTrail>,
}

impl AuditListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the trail recorded so far
    pub fn trail(&self) -> AuditTrail {
        self.trail.lock().clone()
    }

    pub fn verify(&self) -> bool {
        self.trail.lock().verify()
    }

    pub fn len(&self) -> usize {
        self.trail.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.trail.lock().is_empty()
    }

    /// Take the recorded trail, leaving an empty one
    pub fn take(&self) -> AuditTrail {
        std::mem::take(&mut *self.trail.lock())
    }

    fn record(&self, event: AuditEvent) {
        self.trail.lock().add_event(event);
    }
}

impl RuleListener for AuditListener {
    fn on_evaluation_error(&self, rule: &dyn Rule, _facts: &Facts, error: &Error) {
        self.record(
            AuditEvent::new(AuditKind::EvaluationFailed)
                .with_rule(rule.name())
                .with_data(serde_json::json!({ "error": error.to_string() }))
                .with_severity(AuditSeverity::Warning),
        );
    }

    fn on_success(&self, rule: &dyn Rule, _facts: &Facts) {
        self.record(
            AuditEvent::new(AuditKind::RuleApplied)
                .with_rule(rule.name())
                .with_data(serde_json::json!({ "priority": rule.priority() })),
        );
    }

    fn on_failure(&self, rule: &dyn Rule, _facts: &Facts, error: &Error) {
        warn!(rule = %rule.name(), error = %error, "Auditing failed rule");
        self.record(
            AuditEvent::new(AuditKind::RuleFailed)
                .with_rule(rule.name())
                .with_data(serde_json::json!({ "error": error.to_string() }))
                .with_severity(AuditSeverity::High),
        );
    }
}

impl RulesEngineListener for AuditListener {
    fn before_rules(&self, rules: &Rules, facts: &Facts) {
        self.record(
            AuditEvent::new(AuditKind::FiringStarted)
                .with_data(serde_json::json!({ "rules": rules.names(), "facts": facts.len() })),
        );
    }

    fn after_rules(&self, _rules: &Rules, facts: &Facts) {
        self.record(
            AuditEvent::new(AuditKind::FiringFinished)
                .with_data(serde_json::json!({ "facts": facts.len() })),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_trail() {
        let mut trail = AuditTrail::new();

        trail.add_event(AuditEvent::new(AuditKind::FiringStarted));
        trail.add_event(AuditEvent::new(AuditKind::RuleApplied).with_rule("r1"));

        assert!(trail.verify());
        assert_eq!(trail.len(), 2);
        assert_eq!(trail.events()[1].previous_hash, trail.events()[0].hash);
        assert_eq!(trail.head(), trail.events()[1].hash.as_deref());
    }

    #[test]
    fn test_tamper_detection() {
        let mut trail = AuditTrail::new();

        trail.add_event(AuditEvent::new(AuditKind::RuleApplied).with_rule("r1"));
        trail.add_event(AuditEvent::new(AuditKind::RuleApplied).with_rule("r2"));

        trail.events[0].rule = Some("tampered".to_string());

        assert!(!trail.verify());
    }

    #[test]
    fn test_removed_event_breaks_chain() {
        let mut trail = AuditTrail::new();
        for kind in [AuditKind::FiringStarted, AuditKind::RuleApplied, AuditKind::FiringFinished] {
            trail.add_event(AuditEvent::new(kind));
        }

        trail.events.remove(1);
        assert!(!trail.verify());
    }

    #[test]
    fn test_json_roundtrip_keeps_chain() {
        let mut trail = AuditTrail::new();
        trail.add_event(
            AuditEvent::new(AuditKind::RuleFailed)
                .with_rule("r1")
                .with_data(serde_json::json!({ "error": "boom" }))
                .with_severity(AuditSeverity::High),
        );

        let json = trail.to_json().unwrap();
        assert!(json.contains("\"rule_failed\""));

        let restored = AuditTrail::from_json(&json).unwrap();
        assert!(restored.verify());
        assert_eq!(restored.events_for("r1").count(), 1);
    }

    #[test]
    fn test_take_resets_listener() {
        let listener = AuditListener::new();
        listener.before_rules(&Rules::new(), &Facts::new());
        assert_eq!(listener.len(), 1);

        let trail = listener.take();
        assert_eq!(trail.len(), 1);
        assert!(listener.is_empty());
    }
}
