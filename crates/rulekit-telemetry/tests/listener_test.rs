//! Telemetry listeners attached to a running engine

use std::sync::Arc;

use rulekit_engine::prelude::*;
use rulekit_telemetry::prelude::*;

fn sample_rules() -> Rules {
    let mut rules = Rules::new();
    rules
        .register(
            RuleBuilder::new()
                .name("greet")
                .priority(1)
                .when(|facts: &Facts| Ok(facts.contains("name")))
                .then(|facts: &mut Facts| facts.put("greeted", true))
                .build(),
        )
        .unwrap();
    rules
        .register(
            RuleBuilder::new()
                .name("explode")
                .priority(2)
                .when(|_: &Facts| Ok(true))
                .then(|_: &mut Facts| Err(anyhow::anyhow!("kaboom").into()))
                .build(),
        )
        .unwrap();
    rules
        .register(
            RuleBuilder::new()
                .name("confused")
                .priority(3)
                .when(|_: &Facts| Err(Error::evaluation("no idea")))
                .build(),
        )
        .unwrap();
    rules
        .register(RuleBuilder::new().name("idle").priority(4).build())
        .unwrap();
    rules
}

#[test]
fn test_metrics_listener_counts_a_firing() {
    let metrics = Arc::new(MetricsListener::new());
    let engine = DefaultRulesEngine::new()
        .with_rule_listener(metrics.clone())
        .with_engine_listener(metrics.clone());

    let mut facts = Facts::new();
    facts.put("name", "ada").unwrap();
    engine.fire(&sample_rules(), &mut facts);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.firings, 1);
    assert_eq!(snapshot.evaluations, 4);
    assert_eq!(snapshot.triggered, 2);
    assert_eq!(snapshot.applied, 1);
    assert_eq!(snapshot.failed, 1);
    assert_eq!(snapshot.evaluation_errors, 1);
}

#[test]
fn test_audit_listener_records_verifiable_trail() {
    let audit = Arc::new(AuditListener::new());
    let engine = DefaultRulesEngine::new()
        .with_rule_listener(audit.clone())
        .with_engine_listener(audit.clone());

    let mut facts = Facts::new();
    facts.put("name", "ada").unwrap();
    engine.fire(&sample_rules(), &mut facts);

    let trail = audit.trail();
    let kinds: Vec<AuditKind> = trail.events().iter().map(|event| event.kind).collect();
    assert_eq!(
        kinds,
        vec![
            AuditKind::FiringStarted,
            AuditKind::RuleApplied,
            AuditKind::RuleFailed,
            AuditKind::EvaluationFailed,
            AuditKind::FiringFinished,
        ]
    );
    assert!(trail.verify());

    let failed: Vec<&AuditEvent> = trail.events_for("explode").collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].data.as_deref().unwrap_or_default().contains("kaboom"));
}

#[test]
fn test_audit_trail_spans_firings() {
    let audit = Arc::new(AuditListener::new());
    let engine = DefaultRulesEngine::new().with_engine_listener(audit.clone());
    let rules = sample_rules();

    engine.fire(&rules, &mut Facts::new());
    engine.fire(&rules, &mut Facts::new());

    assert_eq!(audit.len(), 4);
    assert!(audit.verify());
}

struct Veto(&'static str);

impl RuleListener for Veto {
    fn before_evaluate(&self, rule: &dyn Rule, _facts: &Facts) -> bool {
        rule.name() != self.0
    }
}

#[test]
fn test_metrics_skip_vetoed_rules_whatever_the_listener_order() {
    let metrics_first = Arc::new(MetricsListener::new());
    let metrics_last = Arc::new(MetricsListener::new());
    let engine = DefaultRulesEngine::new()
        .with_rule_listener(metrics_first.clone())
        .with_rule_listener(Arc::new(Veto("greet")))
        .with_rule_listener(metrics_last.clone());

    let mut facts = Facts::new();
    facts.put("name", "ada").unwrap();
    engine.fire(&sample_rules(), &mut facts);

    for metrics in [&metrics_first, &metrics_last] {
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.evaluations, 3);
        assert_eq!(snapshot.triggered, 1);
        assert_eq!(snapshot.applied, 0);
        assert_eq!(snapshot.failed, 1);
        assert_eq!(snapshot.evaluation_errors, 1);
    }
}
