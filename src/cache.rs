//! Schema dumps on disk.
//!
//! `fauna-sync schema --save` writes the loaded schema to a JSON file;
//! `fauna-sync diff --from-cache` reads it back through [`CachedSource`] so a
//! plan can be computed without reaching the database.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reconcile::{ObservedResource, RemoteSchema, ResourceKind, SchemaSource, SourceError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A saved copy of the remote schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDump {
    /// When the schema was fetched
    pub fetched_at: DateTime<Utc>,
    /// Domain it was fetched from
    pub domain: String,
    pub schema: RemoteSchema,
}

impl SchemaDump {
    pub fn new(domain: impl Into<String>, schema: RemoteSchema) -> Self {
        Self {
            fetched_at: Utc::now(),
            domain: domain.into(),
            schema,
        }
    }

    /// Load a dump from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read schema dump: {}", path.display()))?;
        let dump: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid schema dump: {}", path.display()))?;
        log::debug!(
            "Loaded schema dump from {} ({} resources, fetched {})",
            path.display(),
            dump.schema.len(),
            dump.fetched_at
        );
        Ok(dump)
    }

    /// Save the dump as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize schema dump")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write schema dump: {}", path.display()))?;
        log::debug!("Saved schema dump to {}", path.display());
        Ok(())
    }
}

/// Default dump location: `<cache dir>/fauna-sync/schema.json`
pub fn default_path() -> Result<PathBuf> {
    let cache = dirs::cache_dir().context("Could not determine cache directory")?;
    Ok(cache.join("fauna-sync").join("schema.json"))
}

/// Resolve a user-supplied dump path, expanding `~`, or fall back to the default
pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => {
            let raw = path.to_string_lossy();
            Ok(PathBuf::from(shellexpand::tilde(&raw).as_ref()))
        }
        None => default_path(),
    }
}

/// Schema source backed by a saved dump
pub struct CachedSource {
    schema: RemoteSchema,
}

impl CachedSource {
    pub fn new(dump: SchemaDump) -> Self {
        Self {
            schema: dump.schema,
        }
    }
}

impl SchemaSource for CachedSource {
    fn fetch(
        &self,
        kinds: &[ResourceKind],
    ) -> std::result::Result<Vec<ObservedResource>, SourceError> {
        Ok(self
            .schema
            .iter()
            .filter(|r| kinds.contains(&r.kind))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconcile::{Attributes, RemoteRef, Session};
    use serde_json::json;
    use tempfile::TempDir;

    fn schema() -> RemoteSchema {
        let mut attrs = Attributes::new();
        attrs.insert("name".into(), json!("users"));
        attrs.insert("data".into(), json!({"sync_fingerprint": "0123456789abcdef"}));
        RemoteSchema::from_resources([ObservedResource::new(
            ResourceKind::Collection,
            "users",
            attrs,
            RemoteRef::new(json!({"@ref": {"id": "users"}})),
        )])
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("schema.json");

        let dump = SchemaDump::new("db.fauna.com", schema());
        dump.save(&path).unwrap();

        let loaded = SchemaDump::load(&path).unwrap();
        assert_eq!(loaded.domain, "db.fauna.com");
        assert_eq!(loaded.schema, dump.schema);
        assert_eq!(loaded.fetched_at, dump.fetched_at);
    }

    #[test]
    fn test_load_invalid_dump() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.json");
        fs::write(&path, "not json").unwrap();

        let err = SchemaDump::load(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid schema dump"));
    }

    #[test]
    fn test_cached_source_filters_kinds() {
        let source = CachedSource::new(SchemaDump::new("d", schema()));
        assert_eq!(source.fetch(&ResourceKind::ALL).unwrap().len(), 1);
        assert!(source.fetch(&[ResourceKind::Role]).unwrap().is_empty());
    }

    #[test]
    fn test_cached_source_drives_session() {
        let mut session = Session::new(CachedSource::new(SchemaDump::new("d", schema())));
        session.register_role("admin", &json!({"privileges": []})).unwrap();
        session.load_schema().unwrap();

        let plan: Vec<String> = session.diff().unwrap().iter().map(ToString::to_string).collect();
        assert_eq!(plan, vec!["create role admin", "delete collection users"]);
    }

    #[test]
    fn test_resolve_explicit_path() {
        let path = resolve_path(Some(Path::new("/tmp/schema.json"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/schema.json"));
    }
}
