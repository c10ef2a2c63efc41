//! rulekit Telemetry
//!
//! Listeners that observe rule firings:
//! - [`MetricsListener`] counts evaluations and outcomes, and emits them
//!   through the `metrics` facade
//! - [`AuditListener`] appends firing events to a hash-chained
//!   [`AuditTrail`] for tamper detection
//!
//! Both implement [`rulekit_engine::RuleListener`] and
//! [`rulekit_engine::RulesEngineListener`]; register them on an engine for
//! both roles.

pub mod audit;
pub mod metrics;

pub use audit::{AuditEvent, AuditKind, AuditListener, AuditSeverity, AuditTrail};
pub use metrics::{MetricsListener, MetricsSnapshot};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::audit::{AuditEvent, AuditKind, AuditListener, AuditTrail};
    pub use crate::metrics::{MetricsListener, MetricsSnapshot};
}
