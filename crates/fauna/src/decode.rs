//! Decoding of query responses.

use crate::error::{Error, Result};
use reconcile::{Attributes, ObservedResource, RemoteRef, ResourceKind};
use serde::Deserialize;
use serde_json::Value;

/// Fields the service manages itself; never part of declared attributes.
const SERVICE_FIELDS: [&str; 2] = ["ref", "ts"];

/// Successful response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    pub resource: Value,
}

/// Error response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub errors: Vec<ServiceError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

/// Turn a non-success response body into an [`Error::Service`].
pub(crate) fn service_error(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(resp) if !resp.errors.is_empty() => {
            let first = &resp.errors[0];
            Error::Service {
                status,
                code: first.code.clone(),
                description: first.description.clone(),
            }
        }
        _ => Error::Service {
            status,
            code: "http_error".to_string(),
            description: body.chars().take(200).collect(),
        },
    }
}

/// Decode the result of a schema query into observed resources.
///
/// `resource` must be an object with one array per requested kind.
pub fn observed_resources(resource: &Value, kinds: &[ResourceKind]) -> Result<Vec<ObservedResource>> {
    let fields = resource
        .as_object()
        .ok_or_else(|| Error::InvalidResponse("schema result is not an object".to_string()))?;

    let mut observed = Vec::new();
    for kind in kinds {
        let docs = match fields.get(kind.plural()) {
            Some(Value::Array(docs)) => docs,
            Some(_) => {
                return Err(Error::InvalidResponse(format!(
                    "'{}' is not an array",
                    kind.plural()
                )));
            }
            None => {
                return Err(Error::InvalidResponse(format!(
                    "'{}' missing from schema result",
                    kind.plural()
                )));
            }
        };
        for doc in docs {
            observed.push(observed_resource(*kind, doc)?);
        }
    }
    Ok(observed)
}

/// Decode one schema document.
pub fn observed_resource(kind: ResourceKind, doc: &Value) -> Result<ObservedResource> {
    let fields = doc
        .as_object()
        .ok_or_else(|| Error::InvalidResponse(format!("{kind} document is not an object")))?;

    let name = fields
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidResponse(format!("{kind} document has no name")))?;

    let remote_ref = fields
        .get("ref")
        .cloned()
        .ok_or_else(|| Error::InvalidResponse(format!("{kind} '{name}' has no ref")))?;

    let attributes: Attributes = fields
        .iter()
        .filter(|(k, _)| !SERVICE_FIELDS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Ok(ObservedResource::new(
        kind,
        name,
        attributes,
        RemoteRef::new(remote_ref),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn role_doc(name: &str) -> Value {
        json!({
            "ref": {"@ref": {"id": name, "collection": {"@ref": {"id": "roles"}}}},
            "ts": 1_700_000_000_000_000_i64,
            "name": name,
            "privileges": [],
            "data": {"sync_fingerprint": "abc"}
        })
    }

    #[test]
    fn test_observed_resource_strips_service_fields() {
        let res = observed_resource(ResourceKind::Role, &role_doc("admin")).unwrap();
        assert_eq!(res.name, "admin");
        assert!(!res.attributes.contains_key("ref"));
        assert!(!res.attributes.contains_key("ts"));
        assert_eq!(res.fingerprint(), Some("abc"));
        assert_eq!(res.remote_ref.as_value()["@ref"]["id"], json!("admin"));
    }

    #[test]
    fn test_observed_resource_requires_name_and_ref() {
        let no_name = json!({"ref": {"@ref": {"id": "x"}}});
        assert!(observed_resource(ResourceKind::Index, &no_name).is_err());

        let no_ref = json!({"name": "x"});
        assert!(observed_resource(ResourceKind::Index, &no_ref).is_err());
    }

    #[test]
    fn test_observed_resources_all_kinds() {
        let resource = json!({
            "roles": [role_doc("admin"), role_doc("reader")],
            "collections": [],
            "functions": [],
            "indexes": []
        });
        let observed = observed_resources(&resource, &ResourceKind::ALL).unwrap();
        assert_eq!(observed.len(), 2);
        assert!(observed.iter().all(|r| r.kind == ResourceKind::Role));
    }

    #[test]
    fn test_observed_resources_missing_kind() {
        let resource = json!({"roles": []});
        let err = observed_resources(&resource, &ResourceKind::ALL).unwrap_err();
        assert!(err.to_string().contains("collections"));
    }

    #[test]
    fn test_service_error_decodes_first_error() {
        let body = r#"{"errors":[{"code":"unauthorized","description":"Unauthorized"}]}"#;
        match service_error(401, body) {
            Error::Service { status, code, .. } => {
                assert_eq!(status, 401);
                assert_eq!(code, "unauthorized");
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[test]
    fn test_service_error_unparseable_body() {
        match service_error(502, "<html>bad gateway</html>") {
            Error::Service { code, description, .. } => {
                assert_eq!(code, "http_error");
                assert!(description.contains("bad gateway"));
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }
}
