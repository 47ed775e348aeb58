//! Plan execution.
//!
//! Actions run one at a time in plan order. A failed action is recorded and
//! the rest still run; the caller decides what a partial failure means.

use crate::query;
use crate::transport::Transport;
use reconcile::{Action, ActionPlan, ResourceKind, Verb};
use serde::Serialize;

/// Result of applying one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApplyResult {
    /// Resource was created.
    Created,
    /// Resource was updated.
    Updated,
    /// Resource was deleted.
    Deleted,
    /// The service rejected the action or could not be reached.
    Failed {
        /// Error message.
        error: String,
    },
}

impl ApplyResult {
    /// Check if the result represents success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    fn for_verb(verb: Verb) -> Self {
        match verb {
            Verb::Create => Self::Created,
            Verb::Update => Self::Updated,
            Verb::Delete => Self::Deleted,
        }
    }
}

/// Outcome of one action of the plan.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    /// Kind of the resource.
    pub kind: ResourceKind,
    /// Name of the resource.
    pub name: String,
    /// What was attempted.
    pub verb: Verb,
    /// What happened.
    pub result: ApplyResult,
}

/// Summary of execution results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplySummary {
    /// Resources created.
    pub created: usize,
    /// Resources updated.
    pub updated: usize,
    /// Resources deleted.
    pub deleted: usize,
    /// Actions that failed.
    pub failed: usize,
}

impl ApplySummary {
    /// Total number of changes made.
    #[must_use]
    pub fn total_changes(&self) -> usize {
        self.created + self.updated + self.deleted
    }

    /// Check if every action succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Add a result to the summary.
    pub fn add_result(&mut self, result: &ApplyResult) {
        match result {
            ApplyResult::Created => self.created += 1,
            ApplyResult::Updated => self.updated += 1,
            ApplyResult::Deleted => self.deleted += 1,
            ApplyResult::Failed { .. } => self.failed += 1,
        }
    }
}

/// Per-action outcomes plus their summary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyReport {
    /// One outcome per action, in plan order.
    pub outcomes: Vec<ActionOutcome>,
    /// Counts over `outcomes`.
    pub summary: ApplySummary,
}

impl ApplyReport {
    /// Outcomes of failed actions.
    pub fn failures(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.outcomes.iter().filter(|o| !o.result.is_success())
    }
}

/// Progress reporting hook for plan execution.
pub trait ProgressCallback {
    /// Called once before the first action.
    fn on_start(&mut self, total: usize);

    /// Called when an action starts.
    fn on_action_start(&mut self, action: &Action);

    /// Called when an action completes.
    fn on_action_complete(&mut self, action: &Action, result: &ApplyResult);

    /// Called once after the last action.
    fn on_finish(&mut self, summary: &ApplySummary);
}

/// No-op progress callback.
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_start(&mut self, _total: usize) {}
    fn on_action_start(&mut self, _action: &Action) {}
    fn on_action_complete(&mut self, _action: &Action, _result: &ApplyResult) {}
    fn on_finish(&mut self, _summary: &ApplySummary) {}
}

/// Apply every action of `plan` through `transport`, in order.
pub fn execute<T, P>(transport: &T, plan: &ActionPlan, progress: &mut P) -> ApplyReport
where
    T: Transport + ?Sized,
    P: ProgressCallback,
{
    let mut report = ApplyReport::default();
    progress.on_start(plan.len());

    for action in plan {
        progress.on_action_start(action);
        let result = apply_action(transport, action);
        progress.on_action_complete(action, &result);

        report.summary.add_result(&result);
        report.outcomes.push(ActionOutcome {
            kind: action.kind,
            name: action.name.clone(),
            verb: action.verb(),
            result,
        });
    }

    progress.on_finish(&report.summary);
    report
}

fn apply_action<T: Transport + ?Sized>(transport: &T, action: &Action) -> ApplyResult {
    let expr = query::for_action(action);
    match transport.query(&expr) {
        Ok(_) => {
            log::info!("{action}: ok");
            ApplyResult::for_verb(action.verb())
        }
        Err(e) => {
            log::warn!("{action}: {e}");
            ApplyResult::Failed {
                error: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::transport::MockTransport;
    use reconcile::{MockSource, Session};
    use serde_json::json;

    fn plan_with_three_creates() -> ActionPlan {
        let mut session = Session::new(MockSource::new());
        session.register_role("admin", &json!({})).unwrap();
        session.register_collection("users", &json!({})).unwrap();
        session.register_index("users_by_email", &json!({})).unwrap();
        session.load_schema().unwrap();
        session.diff().unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        started: usize,
        completed: Vec<String>,
        finished: Option<ApplySummary>,
    }

    impl ProgressCallback for Recorder {
        fn on_start(&mut self, total: usize) {
            self.started = total;
        }
        fn on_action_start(&mut self, _action: &Action) {}
        fn on_action_complete(&mut self, action: &Action, _result: &ApplyResult) {
            self.completed.push(action.to_string());
        }
        fn on_finish(&mut self, summary: &ApplySummary) {
            self.finished = Some(*summary);
        }
    }

    #[test]
    fn test_execute_all_succeed() {
        let transport = MockTransport::new();
        for _ in 0..3 {
            transport.push_ok(json!({}));
        }

        let report = execute(&transport, &plan_with_three_creates(), &mut NoProgress);
        assert_eq!(report.summary.created, 3);
        assert!(report.summary.is_success());
        assert_eq!(report.outcomes.len(), 3);

        let sent = transport.queries();
        assert!(sent[0].get("create_role").is_some());
        assert!(sent[1].get("create_collection").is_some());
        assert!(sent[2].get("create_index").is_some());
    }

    #[test]
    fn test_execute_continues_after_failure() {
        let transport = MockTransport::new();
        transport.push_ok(json!({}));
        transport.push_err(Error::Service {
            status: 400,
            code: "validation failed".to_string(),
            description: "bad".to_string(),
        });
        transport.push_ok(json!({}));

        let mut progress = Recorder::default();
        let report = execute(&transport, &plan_with_three_creates(), &mut progress);

        assert_eq!(report.summary.created, 2);
        assert_eq!(report.summary.failed, 1);
        assert!(!report.summary.is_success());

        let failed: Vec<&str> = report.failures().map(|o| o.name.as_str()).collect();
        assert_eq!(failed, vec!["users"]);

        assert_eq!(progress.started, 3);
        assert_eq!(progress.completed.len(), 3);
        assert_eq!(progress.finished, Some(report.summary));
    }

    #[test]
    fn test_execute_empty_plan() {
        let transport = MockTransport::new();
        let report = execute(&transport, &ActionPlan::default(), &mut NoProgress);
        assert_eq!(report.summary.total_changes(), 0);
        assert!(transport.queries().is_empty());
    }
}
