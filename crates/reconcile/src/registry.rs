//! In-memory store of declared resources

use crate::error::Result;
use crate::kind::ResourceKind;
use crate::resource::DeclaredResource;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Declared resources of one kind, keyed by name in registration order
pub type DeclaredByName = IndexMap<String, DeclaredResource>;

/// Desired state: kind -> name -> declared resource
///
/// Absence from the registry is what marks a remote resource for deletion,
/// so callers register the full desired state before diffing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Registry {
    resources: BTreeMap<ResourceKind, DeclaredByName>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint and insert a declared resource.
    ///
    /// A resource with the same kind and name replaces the earlier one and
    /// keeps its position.
    pub fn register(&mut self, mut resource: DeclaredResource) -> Result<&DeclaredResource> {
        let token = resource.ensure_fingerprint().to_string();
        let kind = resource.kind();
        let name = resource.name().to_string();
        log::debug!("register {kind} '{name}' ({token})");

        let entries = self.resources.entry(kind).or_default();
        if entries.insert(name.clone(), resource).is_some() {
            log::debug!("{kind} '{name}' was already registered; replaced");
        }
        Ok(&entries[&name])
    }

    /// Declared resources of one kind
    pub fn all(&self, kind: ResourceKind) -> Option<&DeclaredByName> {
        self.resources.get(&kind)
    }

    /// Look up a single declared resource.
    pub fn get(&self, kind: ResourceKind, name: &str) -> Option<&DeclaredResource> {
        self.resources.get(&kind)?.get(name)
    }

    /// Iterate every declared resource in plan order.
    pub fn iter(&self) -> impl Iterator<Item = &DeclaredResource> {
        self.resources.values().flat_map(IndexMap::values)
    }

    /// Total number of declared resources
    pub fn len(&self) -> usize {
        self.resources.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
