//! Declared and observed resources
//!
//! Both sides carry an attribute payload. The fingerprint of a declared
//! resource travels inside that payload, under a reserved key of the
//! metadata object, so it is stored by the remote service and comes back on
//! the next schema load. Only the accessors in this module know where.

use crate::error::{Error, Result};
use crate::fingerprint::fingerprint;
use crate::kind::ResourceKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute payload of a resource
pub type Attributes = Map<String, Value>;

/// Attribute holding free-form user metadata
const METADATA_KEY: &str = "data";

/// Reserved key inside the metadata object
const FINGERPRINT_KEY: &str = "sync_fingerprint";

/// Attribute holding the resource name
const NAME_KEY: &str = "name";

/// Opaque handle the remote service uses to address a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteRef(Value);

impl RemoteRef {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Read the fingerprint stored in an attribute payload, if any.
fn stored_fingerprint(attributes: &Attributes) -> Option<&str> {
    attributes
        .get(METADATA_KEY)?
        .as_object()?
        .get(FINGERPRINT_KEY)?
        .as_str()
}

/// A resource as the caller wants it to exist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclaredResource {
    kind: ResourceKind,
    name: String,
    attributes: Attributes,
}

impl DeclaredResource {
    /// Build a declared resource from a JSON payload.
    ///
    /// The payload must be an object. Its `name` attribute is filled in from
    /// `name` and must agree with it when already present.
    pub fn new(kind: ResourceKind, name: impl Into<String>, attributes: Value) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::validation(kind, &name, "name must not be empty"));
        }

        let mut attributes = match attributes {
            Value::Object(map) => map,
            other => {
                return Err(Error::validation(
                    kind,
                    &name,
                    format!("attributes must be an object, got {}", json_type(&other)),
                ));
            }
        };

        match attributes.get(NAME_KEY) {
            None => {}
            Some(Value::String(existing)) if *existing == name => {}
            Some(other) => {
                return Err(Error::validation(
                    kind,
                    &name,
                    format!("name attribute {other} does not match resource name"),
                ));
            }
        }
        attributes
            .entry(NAME_KEY)
            .or_insert_with(|| Value::String(name.clone()));

        if let Some(meta) = attributes.get(METADATA_KEY) {
            let Some(meta) = meta.as_object() else {
                return Err(Error::validation(
                    kind,
                    &name,
                    format!("'{METADATA_KEY}' must be an object"),
                ));
            };
            if meta.get(FINGERPRINT_KEY).is_some_and(|v| !v.is_string()) {
                return Err(Error::validation(kind, &name, "stored fingerprint must be a string"));
            }
        }

        Ok(Self {
            kind,
            name,
            attributes,
        })
    }

    /// Build a declared resource from any serializable attribute type.
    pub fn from_serialize<T: Serialize + ?Sized>(
        kind: ResourceKind,
        name: impl Into<String>,
        attributes: &T,
    ) -> Result<Self> {
        let name = name.into();
        let value = serde_json::to_value(attributes)
            .map_err(|e| Error::validation(kind, &name, format!("attributes not serializable: {e}")))?;
        Self::new(kind, name, value)
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full attribute payload, including the embedded fingerprint once assigned
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Fingerprint embedded in the payload, if one has been assigned
    pub fn fingerprint(&self) -> Option<&str> {
        stored_fingerprint(&self.attributes)
    }

    /// Compute and embed the fingerprint unless one is already present.
    ///
    /// The hash covers the payload as declared, before the fingerprint
    /// itself is written into it.
    pub fn ensure_fingerprint(&mut self) -> &str {
        if self.fingerprint().is_none() {
            let token = fingerprint(&Value::Object(self.attributes.clone()));
            let meta = self
                .attributes
                .entry(METADATA_KEY)
                .or_insert_with(|| Value::Object(Map::new()));
            // `new` guarantees an existing metadata value is an object
            if let Value::Object(meta) = meta {
                meta.insert(FINGERPRINT_KEY.to_string(), Value::String(token));
            }
        }
        self.fingerprint().unwrap_or_default()
    }

    /// Payload ready to send to the remote service
    pub fn payload(&self) -> Value {
        Value::Object(self.attributes.clone())
    }
}

/// A resource as reported by the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedResource {
    pub kind: ResourceKind,
    pub name: String,
    pub attributes: Attributes,
    pub remote_ref: RemoteRef,
}

impl ObservedResource {
    pub fn new(
        kind: ResourceKind,
        name: impl Into<String>,
        attributes: Attributes,
        remote_ref: RemoteRef,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            attributes,
            remote_ref,
        }
    }

    /// Fingerprint stored on the remote side; `None` for resources this tool never wrote
    pub fn fingerprint(&self) -> Option<&str> {
        stored_fingerprint(&self.attributes)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
