//! Closure-based rules
//!
//! [`RuleBuilder`] assembles a [`DefaultRule`] from a [`Condition`] and an
//! ordered list of [`Action`]s without writing a dedicated type:
//!
//! ```
//! use rulekit_engine::{Rule, RuleBuilder};
//! use rulekit_core::Facts;
//!
//! let rule = RuleBuilder::new()
//!     .name("umbrella")
//!     .description("if it rains then take an umbrella")
//!     .priority(1)
//!     .when(|facts: &Facts| Ok(facts.get::<bool>("rain")?.copied().unwrap_or(false)))
//!     .then(|facts: &mut Facts| facts.put("umbrella", true))
//!     .build();
//!
//! assert_eq!(rule.name(), "umbrella");
//! ```

use std::fmt;

use rulekit_core::{Facts, Result};

use crate::rule::{BasicRule, Rule, DEFAULT_DESCRIPTION, DEFAULT_NAME, DEFAULT_PRIORITY};

/// Condition of a rule
pub trait Condition: Send + Sync {
    /// Evaluate the condition against the facts
    fn evaluate(&self, facts: &Facts) -> Result<bool>;
}

impl<F> Condition for F
where
    F: Fn(&Facts) -> Result<bool> + Send + Sync,
{
    fn evaluate(&self, facts: &Facts) -> Result<bool> {
        self(facts)
    }
}

/// Action of a rule
pub trait Action: Send + Sync {
    /// Perform the action, possibly mutating the facts
    fn execute(&self, facts: &mut Facts) -> Result<()>;
}

impl<F> Action for F
where
    F: Fn(&mut Facts) -> Result<()> + Send + Sync,
{
    fn execute(&self, facts: &mut Facts) -> Result<()> {
        self(facts)
    }
}

/// Condition that always holds
#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

impl Condition for Always {
    fn evaluate(&self, _facts: &Facts) -> Result<bool> {
        Ok(true)
    }
}

/// Condition that never holds
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl Condition for Never {
    fn evaluate(&self, _facts: &Facts) -> Result<bool> {
        Ok(false)
    }
}

/// Rule made of a condition and a sequence of actions.
///
/// Actions run in declaration order; the first failing action aborts the
/// rest and its error becomes the rule's execution error.
pub struct DefaultRule {
    base: BasicRule,
    condition: Box<dyn Condition>,
    actions: Vec<Box<dyn Action>>,
}

impl DefaultRule {
    /// Number of actions attached to this rule
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }
}

impl Rule for DefaultRule {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn description(&self) -> &str {
        self.base.description()
    }

    fn priority(&self) -> i32 {
        self.base.priority()
    }

    fn evaluate(&self, facts: &Facts) -> Result<bool> {
        self.condition.evaluate(facts)
    }

    fn execute(&self, facts: &mut Facts) -> Result<()> {
        for action in &self.actions {
            action.execute(facts)?;
        }
        Ok(())
    }
}

impl fmt::Debug for DefaultRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultRule")
            .field("name", &self.base.name())
            .field("priority", &self.base.priority())
            .field("actions", &self.actions.len())
            .finish()
    }
}

/// Builder for [`DefaultRule`]
pub struct RuleBuilder {
    name: String,
    description: String,
    priority: i32,
    condition: Option<Box<dyn Condition>>,
    actions: Vec<Box<dyn Action>>,
}

impl RuleBuilder {
    /// Create a new builder with default metadata
    pub fn new() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            priority: DEFAULT_PRIORITY,
            condition: None,
            actions: Vec::new(),
        }
    }

    /// Set the rule name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the rule description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the rule priority
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the condition from a closure
    pub fn when<F>(self, condition: F) -> Self
    where
        F: Fn(&Facts) -> Result<bool> + Send + Sync + 'static,
    {
        self.when_condition(condition)
    }

    /// Set the condition from any [`Condition`] implementation
    pub fn when_condition(mut self, condition: impl Condition + 'static) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }

    /// Append an action from a closure
    pub fn then<F>(self, action: F) -> Self
    where
        F: Fn(&mut Facts) -> Result<()> + Send + Sync + 'static,
    {
        self.then_action(action)
    }

    /// Append any [`Action`] implementation
    pub fn then_action(mut self, action: impl Action + 'static) -> Self {
        self.actions.push(Box::new(action));
        self
    }

    /// Build the rule. Without a condition the rule never triggers.
    pub fn build(self) -> DefaultRule {
        DefaultRule {
            base: BasicRule::new(self.name)
                .with_description(self.description)
                .with_priority(self.priority),
            condition: self.condition.unwrap_or_else(|| Box::new(Never)),
            actions: self.actions,
        }
    }
}

impl Default for RuleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulekit_core::Error;

    #[test]
    fn test_builder_metadata() {
        let rule = RuleBuilder::new()
            .name("adult")
            .description("flags adults")
            .priority(3)
            .build();

        assert_eq!(rule.name(), "adult");
        assert_eq!(rule.description(), "flags adults");
        assert_eq!(rule.priority(), 3);
        assert_eq!(rule.action_count(), 0);
    }

    #[test]
    fn test_builder_defaults_never_trigger() {
        let rule = RuleBuilder::default().build();

        assert_eq!(rule.name(), DEFAULT_NAME);
        assert_eq!(rule.priority(), DEFAULT_PRIORITY);
        assert!(!rule.evaluate(&Facts::new()).unwrap());
    }

    #[test]
    fn test_closure_condition_and_actions() {
        let rule = RuleBuilder::new()
            .name("adult")
            .when(|facts: &Facts| Ok(facts.get::<u32>("age")?.map_or(false, |age| *age >= 18)))
            .then(|facts: &mut Facts| facts.put("adult", true))
            .then(|facts: &mut Facts| facts.put("checked", true))
            .build();

        let mut facts = Facts::new();
        facts.put("age", 30_u32).unwrap();

        assert!(rule.evaluate(&facts).unwrap());
        rule.execute(&mut facts).unwrap();
        assert_eq!(facts.get::<bool>("adult").unwrap(), Some(&true));
        assert_eq!(facts.get::<bool>("checked").unwrap(), Some(&true));
    }

    #[test]
    fn test_failing_action_stops_the_rest() {
        let rule = RuleBuilder::new()
            .name("broken")
            .when_condition(Always)
            .then(|_: &mut Facts| Err(Error::execution("boom")))
            .then(|facts: &mut Facts| facts.put("unreachable", true))
            .build();

        let mut facts = Facts::new();
        let err = rule.execute(&mut facts).unwrap_err();

        assert!(matches!(err, Error::Execution(_)));
        assert!(!facts.contains("unreachable"));
    }

    #[test]
    fn test_never_condition() {
        let rule = RuleBuilder::new().when_condition(Never).build();
        assert!(!rule.evaluate(&Facts::new()).unwrap());
    }
}
