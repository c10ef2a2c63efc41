//! rulekit Core
//!
//! Core types shared across rulekit components.
//!
//! This crate provides:
//! - The fact namespace rules are evaluated against
//! - Error types and result handling

pub mod error;
pub mod fact;
pub mod facts;

pub use error::{require_name, Error, Result};
pub use fact::{Fact, FactRef, FactValue};
pub use facts::Facts;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::fact::{Fact, FactValue};
    pub use crate::facts::Facts;
}
