//! Engine parameters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use rulekit_core::Result;

/// Default priority threshold: every priority is eligible
pub const DEFAULT_RULE_PRIORITY_THRESHOLD: i32 = i32::MAX;

/// Short-circuit policy of a rules engine.
///
/// Parameters are a plain value: engines hand out copies, so changing a
/// returned value never reconfigures the engine it came from.
///
/// ```yaml
/// skip_on_first_applied_rule: true
/// priority_threshold: 10
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParameters {
    skip_on_first_applied_rule: bool,
    skip_on_first_failed_rule: bool,
    skip_on_first_non_triggered_rule: bool,
    priority_threshold: i32,
}

impl EngineParameters {
    /// Create parameters from all four settings
    pub fn new(
        skip_on_first_applied_rule: bool,
        skip_on_first_failed_rule: bool,
        skip_on_first_non_triggered_rule: bool,
        priority_threshold: i32,
    ) -> Self {
        Self {
            skip_on_first_applied_rule,
            skip_on_first_failed_rule,
            skip_on_first_non_triggered_rule,
            priority_threshold,
        }
    }

    /// Load parameters from a YAML string. Missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load parameters from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Stop after the first rule whose action succeeded
    pub fn with_skip_on_first_applied_rule(mut self, skip: bool) -> Self {
        self.skip_on_first_applied_rule = skip;
        self
    }

    /// Stop after the first rule whose action failed
    pub fn with_skip_on_first_failed_rule(mut self, skip: bool) -> Self {
        self.skip_on_first_failed_rule = skip;
        self
    }

    /// Stop after the first rule whose condition did not hold
    pub fn with_skip_on_first_non_triggered_rule(mut self, skip: bool) -> Self {
        self.skip_on_first_non_triggered_rule = skip;
        self
    }

    /// Stop at the first rule whose priority is above this value
    pub fn with_priority_threshold(mut self, threshold: i32) -> Self {
        self.priority_threshold = threshold;
        self
    }

    pub fn skip_on_first_applied_rule(&self) -> bool {
        self.skip_on_first_applied_rule
    }

    pub fn skip_on_first_failed_rule(&self) -> bool {
        self.skip_on_first_failed_rule
    }

    pub fn skip_on_first_non_triggered_rule(&self) -> bool {
        self.skip_on_first_non_triggered_rule
    }

    pub fn priority_threshold(&self) -> i32 {
        self.priority_threshold
    }
}

impl Default for EngineParameters {
    fn default() -> Self {
        Self {
            skip_on_first_applied_rule: false,
            skip_on_first_failed_rule: false,
            skip_on_first_non_triggered_rule: false,
            priority_threshold: DEFAULT_RULE_PRIORITY_THRESHOLD,
        }
    }
}

impl fmt::Display for EngineParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "skip_on_first_applied_rule={}, skip_on_first_failed_rule={}, \
             skip_on_first_non_triggered_rule={}, priority_threshold={}",
            self.skip_on_first_applied_rule,
            self.skip_on_first_failed_rule,
            self.skip_on_first_non_triggered_rule,
            self.priority_threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let params = EngineParameters::default();
        assert!(!params.skip_on_first_applied_rule());
        assert!(!params.skip_on_first_failed_rule());
        assert!(!params.skip_on_first_non_triggered_rule());
        assert_eq!(params.priority_threshold(), i32::MAX);
    }

    #[test]
    fn test_builder() {
        let params = EngineParameters::default()
            .with_skip_on_first_applied_rule(true)
            .with_priority_threshold(10);

        assert_eq!(params, EngineParameters::new(true, false, false, 10));
    }

    #[test]
    fn test_from_yaml_partial() {
        let yaml = r#"
skip_on_first_failed_rule: true
priority_threshold: 3
"#;
        let params = EngineParameters::from_yaml(yaml).unwrap();

        assert!(params.skip_on_first_failed_rule());
        assert!(!params.skip_on_first_applied_rule());
        assert_eq!(params.priority_threshold(), 3);
    }

    #[test]
    fn test_from_yaml_invalid() {
        let err = EngineParameters::from_yaml("priority_threshold: high").unwrap_err();
        assert!(matches!(err, rulekit_core::Error::Serialization(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "skip_on_first_non_triggered_rule: true").unwrap();

        let params = EngineParameters::from_file(file.path()).unwrap();
        assert!(params.skip_on_first_non_triggered_rule());
        assert_eq!(params.priority_threshold(), DEFAULT_RULE_PRIORITY_THRESHOLD);
    }

    #[test]
    fn test_missing_file() {
        let err = EngineParameters::from_file("/nonexistent/rulekit.yaml").unwrap_err();
        assert!(matches!(err, rulekit_core::Error::Io(_)));
    }
}
