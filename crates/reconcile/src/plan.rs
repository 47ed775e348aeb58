//! Actions and action plans

use crate::kind::ResourceKind;
use crate::resource::RemoteRef;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// What an action does to its resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Service-ready payload of an action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verb", rename_all = "snake_case")]
pub enum Operation {
    /// Create a resource from its full declared attributes
    Create { attributes: Value },
    /// Replace the attributes of an existing resource
    Update {
        remote_ref: RemoteRef,
        attributes: Value,
    },
    /// Remove an existing resource
    Delete { remote_ref: RemoteRef },
}

impl Operation {
    pub fn verb(&self) -> Verb {
        match self {
            Self::Create { .. } => Verb::Create,
            Self::Update { .. } => Verb::Update,
            Self::Delete { .. } => Verb::Delete,
        }
    }
}

/// One step of a plan, independent of every other step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    pub kind: ResourceKind,
    pub name: String,
    #[serde(flatten)]
    pub operation: Operation,
}

impl Action {
    pub fn verb(&self) -> Verb {
        self.operation.verb()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.verb(), self.kind, self.name)
    }
}

/// Counts of actions by verb
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub creates: usize,
    pub updates: usize,
    pub deletes: usize,
}

impl PlanSummary {
    pub fn total(&self) -> usize {
        self.creates + self.updates + self.deletes
    }

    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

/// Ordered actions that bring the remote state to the declared state
///
/// Within each kind, creates and updates come before deletes; kinds appear
/// in [`ResourceKind::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ActionPlan {
    actions: Vec<Action>,
}

impl ActionPlan {
    pub(crate) fn from_actions(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary::default();
        for action in &self.actions {
            match action.verb() {
                Verb::Create => summary.creates += 1,
                Verb::Update => summary.updates += 1,
                Verb::Delete => summary.deletes += 1,
            }
        }
        summary
    }

    /// Keep only the actions for one kind, preserving order.
    pub fn filter_kind(&self, kind: ResourceKind) -> Self {
        Self {
            actions: self
                .actions
                .iter()
                .filter(|a| a.kind == kind)
                .cloned()
                .collect(),
        }
    }
}

impl IntoIterator for ActionPlan {
    type Item = Action;
    type IntoIter = std::vec::IntoIter<Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_iter()
    }
}

impl<'a> IntoIterator for &'a ActionPlan {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}
