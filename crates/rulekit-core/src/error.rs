//! Error types for rulekit

/// Result type alias using rulekit's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for rulekit operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required argument was missing or blank
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A rule condition failed while being evaluated
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// A rule action failed while being executed
    #[error("execution error: {0}")]
    Execution(String),

    /// A value could not be adapted into a rule
    #[error("adapter error: {0}")]
    Adapter(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    /// Any other error raised from user code inside a rule
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create a new invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new evaluation error
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Create a new execution error
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Create a new adapter error
    pub fn adapter(msg: impl Into<String>) -> Self {
        Self::Adapter(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Reject blank names with an [`Error::InvalidArgument`] carrying `msg`.
pub fn require_name(name: &str, msg: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_argument(msg));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_name() {
        assert!(require_name("rain", "fact name must not be blank").is_ok());

        let err = require_name("  ", "fact name must not be blank").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(err.to_string(), "invalid argument: fact name must not be blank");
    }

    #[test]
    fn test_anyhow_passthrough() {
        let err: Error = anyhow::anyhow!("disk full").into();
        assert_eq!(err.to_string(), "disk full");
    }
}
