//! Declared vs. observed diff
//!
//! For each kind in plan order:
//!
//! 1. Every declared resource missing remotely becomes a create. One that
//!    exists remotely with a different (or no) stored fingerprint becomes an
//!    update. Matching fingerprints produce nothing.
//! 2. Every observed resource with no declared counterpart becomes a delete.
//!
//! Names match exactly and only within a kind.

use crate::kind::ResourceKind;
use crate::plan::{Action, ActionPlan, Operation};
use crate::registry::Registry;
use crate::snapshot::RemoteSchema;

/// Compute the plan that converges `schema` to `registry`.
///
/// Pure: neither input is modified and nothing is fetched. The registry must
/// already hold the complete desired state; anything missing from it is
/// planned for deletion.
pub fn diff(registry: &Registry, schema: &RemoteSchema) -> ActionPlan {
    let mut actions = Vec::new();
    for kind in ResourceKind::ALL {
        diff_kind(kind, registry, schema, &mut actions);
    }
    ActionPlan::from_actions(actions)
}

fn diff_kind(
    kind: ResourceKind,
    registry: &Registry,
    schema: &RemoteSchema,
    actions: &mut Vec<Action>,
) {
    let declared = registry.all(kind);
    let observed = schema.all(kind);

    for (name, resource) in declared.into_iter().flatten() {
        let operation = match observed.and_then(|o| o.get(name)) {
            None => Operation::Create {
                attributes: resource.payload(),
            },
            Some(remote) => {
                if remote.fingerprint().is_some() && remote.fingerprint() == resource.fingerprint()
                {
                    continue;
                }
                Operation::Update {
                    remote_ref: remote.remote_ref.clone(),
                    attributes: resource.payload(),
                }
            }
        };
        push(actions, kind, name, operation);
    }

    for (name, remote) in observed.into_iter().flatten() {
        if declared.is_some_and(|d| d.contains_key(name)) {
            continue;
        }
        push(
            actions,
            kind,
            name,
            Operation::Delete {
                remote_ref: remote.remote_ref.clone(),
            },
        );
    }
}

fn push(actions: &mut Vec<Action>, kind: ResourceKind, name: &str, operation: Operation) {
    let action = Action {
        kind,
        name: name.to_string(),
        operation,
    };
    log::debug!("planned {action}");
    actions.push(action);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Verb;
    use crate::resource::{DeclaredResource, ObservedResource, RemoteRef};
    use serde_json::{Value, json};
    use std::collections::HashSet;

    fn declare(registry: &mut Registry, kind: ResourceKind, name: &str, fp: &str) {
        registry
            .register(
                DeclaredResource::new(kind, name, json!({"data": {"sync_fingerprint": fp}}))
                    .unwrap(),
            )
            .unwrap();
    }

    fn observed(kind: ResourceKind, name: &str, fp: Option<&str>) -> ObservedResource {
        let attrs = match fp {
            Some(fp) => json!({"name": name, "data": {"sync_fingerprint": fp}}),
            None => json!({"name": name}),
        };
        let Value::Object(attrs) = attrs else {
            unreachable!()
        };
        ObservedResource::new(
            kind,
            name,
            attrs,
            RemoteRef::new(json!(format!("{}/{name}", kind.plural()))),
        )
    }

    fn lines(plan: &ActionPlan) -> Vec<String> {
        plan.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_create_when_missing_remotely() {
        let mut registry = Registry::new();
        declare(&mut registry, ResourceKind::Role, "admin", "h1");

        let plan = diff(&registry, &RemoteSchema::default());
        assert_eq!(lines(&plan), vec!["create role admin"]);
        match &plan.actions()[0].operation {
            Operation::Create { attributes } => {
                assert_eq!(attributes["name"], json!("admin"));
                assert_eq!(attributes["data"]["sync_fingerprint"], json!("h1"));
            }
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn test_no_action_when_fingerprints_match() {
        let mut registry = Registry::new();
        declare(&mut registry, ResourceKind::Role, "admin", "h1");
        let schema =
            RemoteSchema::from_resources(vec![observed(ResourceKind::Role, "admin", Some("h1"))]);

        assert!(diff(&registry, &schema).is_empty());
    }

    #[test]
    fn test_update_when_fingerprints_differ() {
        let mut registry = Registry::new();
        declare(&mut registry, ResourceKind::Role, "admin", "h2");
        let schema =
            RemoteSchema::from_resources(vec![observed(ResourceKind::Role, "admin", Some("h1"))]);

        let plan = diff(&registry, &schema);
        assert_eq!(lines(&plan), vec!["update role admin"]);
        match &plan.actions()[0].operation {
            Operation::Update {
                remote_ref,
                attributes,
            } => {
                assert_eq!(remote_ref.as_value(), &json!("roles/admin"));
                assert_eq!(attributes["data"]["sync_fingerprint"], json!("h2"));
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn test_unmanaged_remote_is_always_updated() {
        let mut registry = Registry::new();
        declare(&mut registry, ResourceKind::Function, "login", "h1");
        let schema =
            RemoteSchema::from_resources(vec![observed(ResourceKind::Function, "login", None)]);

        assert_eq!(lines(&diff(&registry, &schema)), vec!["update function login"]);
    }

    #[test]
    fn test_delete_when_not_declared() {
        let schema = RemoteSchema::from_resources(vec![observed(
            ResourceKind::Collection,
            "events",
            Some("h1"),
        )]);

        let plan = diff(&Registry::new(), &schema);
        assert_eq!(lines(&plan), vec!["delete collection events"]);
        assert!(matches!(
            &plan.actions()[0].operation,
            Operation::Delete { remote_ref } if remote_ref.as_value() == &json!("collections/events")
        ));
    }

    #[test]
    fn test_names_do_not_collide_across_kinds() {
        let mut registry = Registry::new();
        declare(&mut registry, ResourceKind::Role, "users", "h1");
        let schema = RemoteSchema::from_resources(vec![observed(
            ResourceKind::Collection,
            "users",
            Some("h1"),
        )]);

        assert_eq!(
            lines(&diff(&registry, &schema)),
            vec!["create role users", "delete collection users"]
        );
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut registry = Registry::new();
        declare(&mut registry, ResourceKind::Index, "ByName", "h1");
        let schema =
            RemoteSchema::from_resources(vec![observed(ResourceKind::Index, "byname", Some("h1"))]);

        assert_eq!(
            lines(&diff(&registry, &schema)),
            vec!["create index ByName", "delete index byname"]
        );
    }

    #[test]
    fn test_ordering() {
        let mut registry = Registry::new();
        declare(&mut registry, ResourceKind::Index, "by_email", "h1");
        declare(&mut registry, ResourceKind::Collection, "users", "h2");
        declare(&mut registry, ResourceKind::Collection, "posts", "h3");
        declare(&mut registry, ResourceKind::Role, "admin", "h4");

        let schema = RemoteSchema::from_resources(vec![
            observed(ResourceKind::Index, "stale_index", Some("x")),
            observed(ResourceKind::Collection, "old", Some("x")),
            observed(ResourceKind::Collection, "posts", Some("x")),
            observed(ResourceKind::Role, "guest", None),
        ]);

        assert_eq!(
            lines(&diff(&registry, &schema)),
            vec![
                "create role admin",
                "delete role guest",
                "create collection users",
                "update collection posts",
                "delete collection old",
                "create index by_email",
                "delete index stale_index",
            ]
        );
    }

    #[test]
    fn test_mirrored_state_is_stable() {
        let mut registry = Registry::new();
        let mut remote = Vec::new();
        for (i, kind) in ResourceKind::ALL.into_iter().enumerate() {
            let fp = format!("h{i}");
            declare(&mut registry, kind, "shared", &fp);
            remote.push(observed(kind, "shared", Some(&fp)));
        }

        assert!(diff(&registry, &RemoteSchema::from_resources(remote)).is_empty());
    }

    #[test]
    fn test_at_most_one_action_per_resource() {
        let mut registry = Registry::new();
        declare(&mut registry, ResourceKind::Role, "a", "1");
        declare(&mut registry, ResourceKind::Role, "b", "2");
        declare(&mut registry, ResourceKind::Role, "c", "3");
        let schema = RemoteSchema::from_resources(vec![
            observed(ResourceKind::Role, "b", Some("2")),
            observed(ResourceKind::Role, "c", Some("old")),
            observed(ResourceKind::Role, "d", Some("4")),
        ]);

        let plan = diff(&registry, &schema);
        let keys: HashSet<(ResourceKind, &str)> =
            plan.iter().map(|a| (a.kind, a.name.as_str())).collect();
        assert_eq!(keys.len(), plan.len());

        let summary = plan.summary();
        assert_eq!((summary.creates, summary.updates, summary.deletes), (1, 1, 1));
        assert_eq!(plan.actions()[0].verb(), Verb::Create);
    }

    #[test]
    fn test_diff_leaves_inputs_untouched() {
        let mut registry = Registry::new();
        declare(&mut registry, ResourceKind::Role, "admin", "h1");
        let schema = RemoteSchema::from_resources(vec![observed(ResourceKind::Role, "x", None)]);
        let (registry_before, schema_before) = (registry.clone(), schema.clone());

        let first = diff(&registry, &schema);
        let second = diff(&registry, &schema);

        assert_eq!(first, second);
        assert_eq!(schema, schema_before);
        assert_eq!(registry.len(), registry_before.len());
    }
}
