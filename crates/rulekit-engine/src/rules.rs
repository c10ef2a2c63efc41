//! Rule registry
//!
//! [`Rules`] is the namespace rules are registered in. Names are unique
//! within a namespace: registering a rule under a name that is already
//! taken replaces the previous rule, whatever its priority or description.
//! Iteration always yields rules in ascending `(priority, name)` order,
//! recomputed from the current membership on each call.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rulekit_core::{require_name, Result};
use tracing::debug;

use crate::rule::{compare_rules, Rule, RuleKey};

/// Converts arbitrary rule definitions into [`Rule`]s.
///
/// Any `Fn(T) -> Result<Arc<dyn Rule>>` is an adapter. Adapters report
/// values they cannot convert with [`Error::Adapter`](rulekit_core::Error::Adapter).
pub trait RuleAdapter<T> {
    /// Convert a candidate into a rule
    fn adapt(&self, candidate: T) -> Result<Arc<dyn Rule>>;
}

impl<T, F> RuleAdapter<T> for F
where
    F: Fn(T) -> Result<Arc<dyn Rule>>,
{
    fn adapt(&self, candidate: T) -> Result<Arc<dyn Rule>> {
        self(candidate)
    }
}

/// A set of uniquely named rules
#[derive(Clone, Default)]
pub struct Rules {
    rules: HashMap<String, Arc<dyn Rule>>,
}

impl Rules {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from an initial collection of rules
    pub fn from_rules(rules: impl IntoIterator<Item = Arc<dyn Rule>>) -> Result<Self> {
        let mut registry = Self::new();
        registry.register_all(rules)?;
        Ok(registry)
    }

    /// Register a rule, replacing any rule with the same name
    pub fn register<R: Rule + 'static>(&mut self, rule: R) -> Result<()> {
        self.register_shared(Arc::new(rule))
    }

    /// Register a shared rule, replacing any rule with the same name
    pub fn register_shared(&mut self, rule: Arc<dyn Rule>) -> Result<()> {
        require_name(rule.name(), "rule name must not be blank")?;

        let name = rule.name().to_string();
        if let Some(previous) = self.rules.insert(name, rule) {
            debug!(
                rule = %previous.name(),
                priority = previous.priority(),
                "Replaced previously registered rule"
            );
        }
        Ok(())
    }

    /// Register several rules. Stops at the first invalid rule.
    pub fn register_all(&mut self, rules: impl IntoIterator<Item = Arc<dyn Rule>>) -> Result<()> {
        for rule in rules {
            self.register_shared(rule)?;
        }
        Ok(())
    }

    /// Adapt each candidate and register the resulting rule.
    ///
    /// The first adapter failure is returned; candidates before it stay
    /// registered.
    pub fn register_adapted<T, A>(
        &mut self,
        adapter: &A,
        candidates: impl IntoIterator<Item = T>,
    ) -> Result<()>
    where
        A: RuleAdapter<T> + ?Sized,
    {
        for candidate in candidates {
            let rule = adapter.adapt(candidate)?;
            self.register_shared(rule)?;
        }
        Ok(())
    }

    /// Unregister the rule equal to `rule` under `(priority, name)`.
    ///
    /// A registered rule with the same name but a different priority is
    /// left in place.
    pub fn unregister(&mut self, rule: &dyn Rule) -> Option<Arc<dyn Rule>> {
        let key = RuleKey::of(rule);
        let matches = self
            .rules
            .get(key.name())
            .is_some_and(|registered| registered.priority() == key.priority());

        if matches {
            self.rules.remove(key.name())
        } else {
            None
        }
    }

    /// Unregister a rule by name
    pub fn unregister_by_name(&mut self, name: &str) -> Result<Option<Arc<dyn Rule>>> {
        require_name(name, "rule name must not be blank")?;
        Ok(self.rules.remove(name))
    }

    /// Look up a rule by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Rule>> {
        self.rules.get(name)
    }

    /// Whether a rule with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Iterate over rules in ascending `(priority, name)` order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> + '_ {
        let mut ordered: Vec<&Arc<dyn Rule>> = self.rules.values().collect();
        ordered.sort_by(|a, b| compare_rules(a.as_ref(), b.as_ref()));
        ordered.into_iter()
    }

    /// Rule names in iteration order
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|rule| rule.name()).collect()
    }

    /// Number of registered rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule is registered
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Remove all rules
    pub fn clear(&mut self) {
        self.rules.clear();
    }
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|rule| RuleKey::of(rule.as_ref())))
            .finish()
    }
}
