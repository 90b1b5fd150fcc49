//! Module namespaces for state addressing.
//!
//! Independently developed modules share one physical backend; every state
//! key is scoped by the owning module's namespace so their key spaces cannot
//! collide. A handle is created once when the module is wired up and passed
//! explicitly on each access.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// An interned module identifier.
///
/// Cheap to clone (shared allocation) and compared by name. Construct one
/// per module at wiring time; never derive namespaces from runtime strings
/// on the access path.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(Arc<str>);

impl Namespace {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Namespace({})", self.0)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Namespace {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Namespace {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self(Arc::from(name.as_str())))
    }
}
