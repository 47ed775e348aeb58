//! Resource kinds tracked by the reconciler

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of schema resource in the remote service
///
/// Declaration order is plan order: every kind's actions appear in an
/// [`ActionPlan`](crate::ActionPlan) in the order of [`ResourceKind::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Access-control role
    Role,
    /// Data collection
    Collection,
    /// Stored function
    Function,
    /// Secondary index
    Index,
}

impl ResourceKind {
    /// All kinds, in plan order
    pub const ALL: [Self; 4] = [Self::Role, Self::Collection, Self::Function, Self::Index];

    /// Plural name used to group resources of this kind
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Role => "roles",
            Self::Collection => "collections",
            Self::Function => "functions",
            Self::Index => "indexes",
        }
    }

    /// Singular name
    pub fn singular(&self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::Collection => "collection",
            Self::Function => "function",
            Self::Index => "index",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    /// Parse either the singular or the plural form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.singular() == s || k.plural() == s)
            .ok_or_else(|| Error::UnknownResourceKind(s.to_string()))
    }
}
