//! Remote schema snapshot
//!
//! A [`SchemaSnapshot`] is loaded exactly once per reconciliation session.
//! Loading twice would let a diff mix stale and fresh state, so the second
//! call fails with [`Error::AlreadyLoaded`] and leaves the first result intact.

use crate::error::{Error, Result};
use crate::kind::ResourceKind;
use crate::resource::ObservedResource;
use crate::source::SchemaSource;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Observed resources of one kind, keyed by name in the order the service reported them
pub type ObservedByName = IndexMap<String, ObservedResource>;

/// Observed state grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteSchema {
    resources: BTreeMap<ResourceKind, ObservedByName>,
}

impl RemoteSchema {
    /// Group observed resources by kind and name.
    pub fn from_resources(resources: impl IntoIterator<Item = ObservedResource>) -> Self {
        let mut grouped: BTreeMap<ResourceKind, ObservedByName> = BTreeMap::new();
        for resource in resources {
            let entries = grouped.entry(resource.kind).or_default();
            if let Some(previous) = entries.insert(resource.name.clone(), resource) {
                log::warn!(
                    "remote reported {} '{}' more than once; keeping the last",
                    previous.kind,
                    previous.name
                );
            }
        }
        Self { resources: grouped }
    }

    /// Observed resources of one kind
    pub fn all(&self, kind: ResourceKind) -> Option<&ObservedByName> {
        self.resources.get(&kind)
    }

    pub fn get(&self, kind: ResourceKind, name: &str) -> Option<&ObservedResource> {
        self.resources.get(&kind)?.get(name)
    }

    /// Number of observed resources of one kind
    pub fn count(&self, kind: ResourceKind) -> usize {
        self.resources.get(&kind).map_or(0, IndexMap::len)
    }

    /// Iterate every observed resource in plan order.
    pub fn iter(&self) -> impl Iterator<Item = &ObservedResource> {
        self.resources.values().flat_map(IndexMap::values)
    }

    pub fn len(&self) -> usize {
        self.resources.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
enum LoadState {
    #[default]
    Pending,
    Loaded(RemoteSchema),
    /// A load was attempted and failed; the session must be recreated
    Failed,
}

/// Load-once holder for the remote schema
#[derive(Debug, Default)]
pub struct SchemaSnapshot {
    state: LoadState,
}

impl SchemaSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch every tracked kind from `source` in one request.
    pub fn load(&mut self, source: &dyn SchemaSource) -> Result<&RemoteSchema> {
        if !matches!(self.state, LoadState::Pending) {
            return Err(Error::AlreadyLoaded);
        }

        log::info!("loading remote schema");
        let resources = match source.fetch(&ResourceKind::ALL) {
            Ok(resources) => resources,
            Err(e) => {
                self.state = LoadState::Failed;
                return Err(Error::Remote(e));
            }
        };

        let schema = RemoteSchema::from_resources(resources);
        for kind in ResourceKind::ALL {
            log::info!("observed {} {}", schema.count(kind), kind.plural());
        }

        self.state = LoadState::Loaded(schema);
        self.get().ok_or(Error::SchemaNotLoaded)
    }

    /// The loaded schema, if the load succeeded
    pub fn get(&self) -> Option<&RemoteSchema> {
        match &self.state {
            LoadState::Loaded(schema) => Some(schema),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, LoadState::Loaded(_))
    }
}
