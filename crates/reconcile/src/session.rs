//! Caller-facing reconciliation session
//!
//! A session owns one registry, one snapshot, and the source the snapshot
//! is loaded from. The intended sequence is: register every declared
//! resource, call [`Session::load_schema`] once, then [`Session::diff`].
//! Parallel reconciliations each get their own session.

use crate::diff;
use crate::error::{Error, Result};
use crate::kind::ResourceKind;
use crate::plan::ActionPlan;
use crate::registry::Registry;
use crate::resource::DeclaredResource;
use crate::snapshot::{RemoteSchema, SchemaSnapshot};
use crate::source::SchemaSource;
use serde::Serialize;

pub struct Session<S: SchemaSource> {
    source: S,
    registry: Registry,
    snapshot: SchemaSnapshot,
}

impl<S: SchemaSource> Session<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            registry: Registry::new(),
            snapshot: SchemaSnapshot::new(),
        }
    }

    /// Declare a resource of any kind.
    pub fn register<T: Serialize + ?Sized>(
        &mut self,
        kind: ResourceKind,
        name: &str,
        attributes: &T,
    ) -> Result<&DeclaredResource> {
        let resource = DeclaredResource::from_serialize(kind, name, attributes)?;
        self.registry.register(resource)
    }

    pub fn register_role<T: Serialize + ?Sized>(
        &mut self,
        name: &str,
        attributes: &T,
    ) -> Result<&DeclaredResource> {
        self.register(ResourceKind::Role, name, attributes)
    }

    pub fn register_collection<T: Serialize + ?Sized>(
        &mut self,
        name: &str,
        attributes: &T,
    ) -> Result<&DeclaredResource> {
        self.register(ResourceKind::Collection, name, attributes)
    }

    pub fn register_function<T: Serialize + ?Sized>(
        &mut self,
        name: &str,
        attributes: &T,
    ) -> Result<&DeclaredResource> {
        self.register(ResourceKind::Function, name, attributes)
    }

    pub fn register_index<T: Serialize + ?Sized>(
        &mut self,
        name: &str,
        attributes: &T,
    ) -> Result<&DeclaredResource> {
        self.register(ResourceKind::Index, name, attributes)
    }

    /// Declare an already-built resource.
    pub fn register_declared(&mut self, resource: DeclaredResource) -> Result<&DeclaredResource> {
        self.registry.register(resource)
    }

    /// Load the remote schema. Allowed once per session, successful or not.
    pub fn load_schema(&mut self) -> Result<&RemoteSchema> {
        self.snapshot.load(&self.source)
    }

    /// The loaded schema, if any
    pub fn schema(&self) -> Option<&RemoteSchema> {
        self.snapshot.get()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Plan the actions that converge the remote schema to the registry.
    pub fn diff(&self) -> Result<ActionPlan> {
        let schema = self.snapshot.get().ok_or(Error::SchemaNotLoaded)?;
        let plan = diff::diff(&self.registry, schema);
        let summary = plan.summary();
        log::info!(
            "planned {} creates, {} updates, {} deletes",
            summary.creates,
            summary.updates,
            summary.deletes
        );
        Ok(plan)
    }

    /// Give back the source, e.g. to execute the plan with the same client.
    pub fn into_source(self) -> S {
        self.source
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
