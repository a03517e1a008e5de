//! Account identity
//!
//! A `Principal` is the opaque identifier the wallet/session layer hands to
//! the engine for every call. The engine never interprets its contents beyond
//! equality and ordering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique account identifier issuing or targeted by a command
///
/// Ordering is lexicographic on the underlying string so that account maps
/// keyed by principal iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Principal {
    fn from(s: String) -> Self {
        Self(s)
    }
}
