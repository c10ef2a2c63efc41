//! rulekit Rules Engine
//!
//! Prioritized rule evaluation over a fact namespace.
//!
//! Rules are registered in a [`Rules`] namespace and fired by an engine:
//! - [`DefaultRulesEngine`] fires each rule once, in ascending
//!   `(priority, name)` order, honoring the skip flags and priority
//!   threshold of its [`EngineParameters`]
//! - [`InferenceRulesEngine`] keeps firing triggered rules until none remain
//!
//! Listeners observe every step of a firing, and each firing returns a
//! [`FiringReport`] with the outcome of every rule it reached.
//!
//! ```
//! use rulekit_engine::prelude::*;
//!
//! let mut rules = Rules::new();
//! rules.register(
//!     RuleBuilder::new()
//!         .name("weather")
//!         .when(|facts: &Facts| Ok(facts.get::<bool>("rain")?.copied().unwrap_or(false)))
//!         .then(|facts: &mut Facts| facts.put("umbrella", true))
//!         .build(),
//! )?;
//!
//! let mut facts = Facts::new();
//! facts.put("rain", true)?;
//!
//! let report = DefaultRulesEngine::new().fire(&rules, &mut facts);
//! assert_eq!(report.applied(), vec!["weather"]);
//! assert_eq!(facts.get::<bool>("umbrella")?, Some(&true));
//! # Ok::<(), rulekit_engine::Error>(())
//! ```

pub mod builder;
pub mod engine;
pub mod inference;
pub mod listener;
pub mod parameters;
pub mod report;
pub mod rule;
pub mod rules;

pub use builder::{Action, Always, Condition, DefaultRule, Never, RuleBuilder};
pub use engine::{DefaultRulesEngine, EngineBase, RulesEngine};
pub use inference::InferenceRulesEngine;
pub use listener::{RuleListener, RulesEngineListener};
pub use parameters::{EngineParameters, DEFAULT_RULE_PRIORITY_THRESHOLD};
pub use report::{FiringReport, Outcome, ReportSummary, RuleOutcome};
pub use rule::{compare_rules, BasicRule, Rule, RuleKey};
pub use rules::{RuleAdapter, Rules};

pub use rulekit_core::{Error, Fact, Facts, Result};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::builder::{Action, Condition, RuleBuilder};
    pub use crate::engine::{DefaultRulesEngine, RulesEngine};
    pub use crate::inference::InferenceRulesEngine;
    pub use crate::listener::{RuleListener, RulesEngineListener};
    pub use crate::parameters::EngineParameters;
    pub use crate::report::{FiringReport, Outcome};
    pub use crate::rule::{BasicRule, Rule};
    pub use crate::rules::Rules;
    pub use rulekit_core::{Error, Fact, Facts, Result};
}
