//! FQL wire expressions.
//!
//! Queries are sent as JSON-encoded expression trees. A plain JSON object in
//! that encoding is read as a function call, so literal objects must be
//! wrapped in `{"object": ...}`. Tagged values such as `{"@ref": ...}` or
//! `{"@query": ...}` are literals already and pass through unchanged.

use reconcile::{Action, Operation, RemoteRef, ResourceKind};
use serde_json::{Map, Value, json};

/// Expression listing every resource of `kind`, fully fetched.
///
/// Equivalent to `Select("data", Map(Paginate(Roles(), {size}), Lambda("x", Get(Var("x")))))`.
pub fn list_all(kind: ResourceKind, page_size: u32) -> Value {
    json!({
        "select": "data",
        "from": {
            "map": {
                "lambda": "x",
                "expr": { "get": { "var": "x" } }
            },
            "collection": {
                "paginate": { kind.plural(): null },
                "size": page_size
            }
        }
    })
}

/// Expression fetching every kind in one round trip, keyed by plural name.
pub fn schema_query(kinds: &[ResourceKind], page_size: u32) -> Value {
    let fields: Map<String, Value> = kinds
        .iter()
        .map(|kind| (kind.plural().to_string(), list_all(*kind, page_size)))
        .collect();
    json!({ "object": fields })
}

/// Name of the create function for a kind.
pub fn create_fn(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Role => "create_role",
        ResourceKind::Collection => "create_collection",
        ResourceKind::Function => "create_function",
        ResourceKind::Index => "create_index",
    }
}

/// Expression creating a resource from its attributes.
pub fn create(kind: ResourceKind, attributes: &Value) -> Value {
    json!({ create_fn(kind): literal(attributes) })
}

/// Expression replacing the attributes of an existing resource.
pub fn update(remote_ref: &RemoteRef, attributes: &Value) -> Value {
    json!({
        "update": remote_ref.as_value(),
        "params": literal(attributes)
    })
}

/// Expression deleting an existing resource.
pub fn delete(remote_ref: &RemoteRef) -> Value {
    json!({ "delete": remote_ref.as_value() })
}

/// Translate a planned action into the expression that performs it.
pub fn for_action(action: &Action) -> Value {
    match &action.operation {
        Operation::Create { attributes } => create(action.kind, attributes),
        Operation::Update {
            remote_ref,
            attributes,
        } => update(remote_ref, attributes),
        Operation::Delete { remote_ref } => delete(remote_ref),
    }
}

/// Encode a JSON value as an FQL literal.
pub fn literal(value: &Value) -> Value {
    match value {
        Value::Object(map) if is_tagged(map) => value.clone(),
        Value::Object(map) => {
            let inner: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), literal(v)))
                .collect();
            json!({ "object": inner })
        }
        Value::Array(items) => Value::Array(items.iter().map(literal).collect()),
        scalar => scalar.clone(),
    }
}

/// A single-key object whose key starts with `@` is a typed wire value.
fn is_tagged(map: &Map<String, Value>) -> bool {
    map.len() == 1 && map.keys().all(|k| k.starts_with('@'))
}
