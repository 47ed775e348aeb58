//! Content fingerprints for change detection
//!
//! A fingerprint is a short BLAKE3 digest of the canonical JSON form of a
//! resource's attributes. Object keys are sorted recursively before hashing,
//! so two payloads that differ only in key order hash identically.

use blake3::Hasher;
use serde_json::Value;

/// Number of hex characters kept from the digest
pub const FINGERPRINT_LEN: usize = 16;

/// Compute the fingerprint token for an attribute payload.
pub fn fingerprint(attributes: &Value) -> String {
    let mut hasher = Hasher::new();
    hasher.update(canonical_json(attributes).as_bytes());
    let mut hex = hasher.finalize().to_hex().to_string();
    hex.truncate(FINGERPRINT_LEN);
    hex
}

/// Serialize a value to compact JSON with object keys in sorted order.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Value's Display is compact JSON, including string escaping
                out.push_str(&Value::from(key.as_str()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fingerprint_is_stable() {
        let attrs = json!({"name": "admin", "privileges": [{"resource": "users"}]});
        assert_eq!(fingerprint(&attrs), fingerprint(&attrs));
        assert_eq!(fingerprint(&attrs).len(), FINGERPRINT_LEN);
    }

    #[test]
    fn test_fingerprint_ignores_key_order() {
        let a: Value =
            serde_json::from_str(r#"{"name":"admin","actions":{"read":true,"write":false}}"#)
                .unwrap();
        let b: Value =
            serde_json::from_str(r#"{"actions":{"write":false,"read":true},"name":"admin"}"#)
                .unwrap();
        // Maps keep insertion order, so the inputs really differ before canonicalization
        assert_ne!(a.to_string(), b.to_string());
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_canonical_json_sorts_insertion_ordered_map() {
        let mut inner = serde_json::Map::new();
        inner.insert("z".to_string(), json!(1));
        inner.insert("m".to_string(), json!(2));
        let mut outer = serde_json::Map::new();
        outer.insert("name".to_string(), json!("admin"));
        outer.insert("actions".to_string(), Value::Object(inner));
        let v = Value::Object(outer);

        assert_eq!(v.to_string(), r#"{"name":"admin","actions":{"z":1,"m":2}}"#);
        assert_eq!(canonical_json(&v), r#"{"actions":{"m":2,"z":1},"name":"admin"}"#);
    }

    #[test]
    fn test_fingerprint_detects_value_change() {
        let a = json!({"actions": {"read": true}});
        let b = json!({"actions": {"read": false}});
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_array_order_is_significant() {
        let a = json!({"terms": ["a", "b"]});
        let b = json!({"terms": ["b", "a"]});
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_canonical_json_sorts_nested_keys() {
        let v = json!({"b": 1, "a": {"d": null, "c": "x\"y"}});
        assert_eq!(canonical_json(&v), r#"{"a":{"c":"x\"y","d":null},"b":1}"#);
    }
}
