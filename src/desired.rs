//! Desired-state manifest files.
//!
//! A manifest is a TOML or JSON document whose top-level keys name resource
//! kinds (`roles` or `role`, `collections`, ...). Each key holds an array of
//! tables; every table needs a `name` and the rest are the resource's
//! attributes:
//!
//! ```toml
//! [[collections]]
//! name = "users"
//! history_days = 30
//!
//! [[indexes]]
//! name = "users_by_email"
//! source = { "@ref" = { id = "users", collection = { "@ref" = { id = "collections" } } } }
//! terms = [{ field = ["data", "email"] }]
//! unique = true
//! ```

use anyhow::{Context, Result, bail};
use reconcile::{DeclaredResource, ResourceKind};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Manifest file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Toml,
    Json,
}

impl ManifestFormat {
    /// Pick the format from the file extension; anything but `.json` is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Read and validate every resource declared in a manifest file.
pub fn load(path: &Path) -> Result<Vec<DeclaredResource>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read manifest: {}", path.display()))?;
    let resources = parse(&content, ManifestFormat::from_path(path))
        .with_context(|| format!("Invalid manifest: {}", path.display()))?;
    log::debug!("Loaded {} resources from {}", resources.len(), path.display());
    Ok(resources)
}

/// Parse manifest text into declared resources, in file order per kind.
pub fn parse(content: &str, format: ManifestFormat) -> Result<Vec<DeclaredResource>> {
    let document: Value = match format {
        ManifestFormat::Toml => toml::from_str(content).context("Invalid TOML")?,
        ManifestFormat::Json => serde_json::from_str(content).context("Invalid JSON")?,
    };

    let Value::Object(sections) = document else {
        bail!("manifest must be a table of resource kinds");
    };

    let mut resources = Vec::new();
    let mut seen = HashSet::new();

    for (key, entries) in sections {
        let kind: ResourceKind = key.parse()?;
        let Value::Array(entries) = entries else {
            bail!("'{key}' must be an array of tables");
        };

        for (i, entry) in entries.into_iter().enumerate() {
            let name = entry
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .with_context(|| format!("{kind} #{} has no name", i + 1))?;

            if !seen.insert((kind, name.clone())) {
                log::warn!("{kind} '{name}' declared more than once; the last one wins");
            }
            resources.push(DeclaredResource::new(kind, name, entry)?);
        }
    }

    Ok(resources)
}
