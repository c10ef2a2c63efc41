//! A single named fact

use std::any::Any;
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{require_name, Result};

/// Values that can be stored in a fact.
///
/// Implemented for every `'static` type that is `Debug + Send + Sync`, so
/// plain values (`i32`, `String`, user structs) can be stored directly.
pub trait FactValue: Any + fmt::Debug + Send + Sync {
    /// Access the value as `Any` for downcasting
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug + Send + Sync> FactValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Shared handle to a fact value, as handed out by map snapshots
pub type FactRef = Arc<dyn FactValue>;

/// A named value in a fact namespace.
///
/// Identity is the name alone: two facts with the same name are equal and
/// hash identically whatever their values.
#[derive(Clone)]
pub struct Fact {
    name: String,
    value: FactRef,
}

impl Fact {
    /// Create a new fact, rejecting blank names
    pub fn new<T: FactValue>(name: impl Into<String>, value: T) -> Result<Self> {
        let name = name.into();
        require_name(&name, "fact name must not be blank")?;
        Ok(Self {
            name,
            value: Arc::new(value),
        })
    }

    /// Create a fact around an already shared value
    pub fn from_shared(name: impl Into<String>, value: FactRef) -> Result<Self> {
        let name = name.into();
        require_name(&name, "fact name must not be blank")?;
        Ok(Self { name, value })
    }

    /// Fact name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fact value, type-erased
    pub fn value(&self) -> &dyn FactValue {
        &*self.value
    }

    /// Fact value downcast to `T`, or `None` when the stored type differs
    pub fn value_as<T: Any>(&self) -> Option<&T> {
        let value: &dyn FactValue = &*self.value;
        value.as_any().downcast_ref::<T>()
    }

    /// Clone the shared handle to the value
    pub fn shared_value(&self) -> FactRef {
        Arc::clone(&self.value)
    }
}

impl PartialEq for Fact {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Fact {}

impl Hash for Fact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must match `str`'s hash so set lookups through `Borrow<str>` work.
        self.name.hash(state);
    }
}

impl Borrow<str> for Fact {
    fn borrow(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fact")
            .field("name", &self.name)
            .field("value", &self.value)
            .finish()
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fact{{name='{}', value={:?}}}", self.name, self.value)
    }
}
