//! Rule abstraction and ordering

use std::cmp::Ordering;
use std::fmt;

use rulekit_core::{Facts, Result};

/// Default rule name
pub const DEFAULT_NAME: &str = "rule";

/// Default rule description
pub const DEFAULT_DESCRIPTION: &str = "description";

/// Default rule priority (lowest urgency short of `i32::MAX`)
pub const DEFAULT_PRIORITY: i32 = i32::MAX - 1;

/// A named, prioritized condition/action pair.
///
/// Rules are registered in a [`Rules`](crate::Rules) namespace where each
/// rule must have a unique name. Rules are ordered by priority (lower value
/// first), then by name.
pub trait Rule: Send + Sync {
    /// Rule name
    fn name(&self) -> &str {
        DEFAULT_NAME
    }

    /// Rule description
    fn description(&self) -> &str {
        DEFAULT_DESCRIPTION
    }

    /// Rule priority
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    /// The rule's condition.
    ///
    /// An `Err` is treated by the engine as "not triggered".
    fn evaluate(&self, facts: &Facts) -> Result<bool>;

    /// The rule's action
    fn execute(&self, facts: &mut Facts) -> Result<()>;
}

/// Compare two rules by priority, then by name.
///
/// Names compare by UTF-16 code units, so rule sets keep the order they
/// have in UTF-16 based engines. This differs from `str` byte order only
/// for names mixing U+E000..U+FFFF with characters above U+FFFF.
pub fn compare_rules(a: &dyn Rule, b: &dyn Rule) -> Ordering {
    compare_keys(a.priority(), a.name(), b.priority(), b.name())
}

fn compare_keys(a_priority: i32, a_name: &str, b_priority: i32, b_name: &str) -> Ordering {
    a_priority
        .cmp(&b_priority)
        .then_with(|| a_name.encode_utf16().cmp(b_name.encode_utf16()))
}

/// Ordering identity of a rule: `(priority, name)`.
///
/// Two rules with equal keys are indistinguishable for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleKey {
    priority: i32,
    name: String,
}

impl RuleKey {
    /// Key of the given rule
    pub fn of(rule: &dyn Rule) -> Self {
        Self {
            priority: rule.priority(),
            name: rule.name().to_string(),
        }
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Ord for RuleKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_keys(self.priority, &self.name, other.priority, &other.name)
    }
}

impl PartialOrd for RuleKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (priority {})", self.name, self.priority)
    }
}

/// Basic rule carrying a name, description and priority.
///
/// Its condition never holds and its action does nothing. Custom rules
/// embed a `BasicRule` and delegate the metadata accessors to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BasicRule {
    name: String,
    description: String,
    priority: i32,
}

impl BasicRule {
    /// Create a new basic rule with default description and priority
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: DEFAULT_DESCRIPTION.to_string(),
            priority: DEFAULT_PRIORITY,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }
}

impl Default for BasicRule {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}

impl Rule for BasicRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn evaluate(&self, _facts: &Facts) -> Result<bool> {
        Ok(false)
    }

    fn execute(&self, _facts: &mut Facts) -> Result<()> {
        Ok(())
    }
}

impl fmt::Display for BasicRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
