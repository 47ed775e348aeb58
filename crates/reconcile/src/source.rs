//! Schema sources - where observed resources come from
//!
//! The reconciler only depends on the shape of what a source returns: for
//! each tracked kind, the full list of `{name, attributes, remote_ref}`
//! tuples. Network clients, cached dumps, and test doubles all sit behind
//! [`SchemaSource`].

use crate::error::SourceError;
use crate::kind::ResourceKind;
use crate::resource::ObservedResource;
use std::sync::{Arc, Mutex};

/// Provider of the remote schema
pub trait SchemaSource: Send + Sync {
    /// Fetch every resource of the given kinds in one batched request.
    ///
    /// Implementations return fully materialized results; pagination is
    /// theirs to exhaust. Failures are reported as-is and never retried by
    /// the caller.
    fn fetch(
        &self,
        kinds: &[ResourceKind],
    ) -> std::result::Result<Vec<ObservedResource>, SourceError>;
}

impl<S: SchemaSource + ?Sized> SchemaSource for Box<S> {
    fn fetch(
        &self,
        kinds: &[ResourceKind],
    ) -> std::result::Result<Vec<ObservedResource>, SourceError> {
        (**self).fetch(kinds)
    }
}

/// In-memory source for testing without network access
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    resources: Arc<Mutex<Vec<ObservedResource>>>,
    failure: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<usize>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observed resource to every subsequent fetch.
    pub fn add(&self, resource: ObservedResource) {
        lock(&self.resources).push(resource);
    }

    /// Make every subsequent fetch fail with the given message.
    pub fn fail_with(&self, message: impl Into<String>) {
        *lock(&self.failure) = Some(message.into());
    }

    /// Number of fetches served so far
    pub fn calls(&self) -> usize {
        *lock(&self.calls)
    }
}

impl SchemaSource for MockSource {
    fn fetch(
        &self,
        kinds: &[ResourceKind],
    ) -> std::result::Result<Vec<ObservedResource>, SourceError> {
        *lock(&self.calls) += 1;
        if let Some(message) = lock(&self.failure).clone() {
            return Err(message.into());
        }
        Ok(lock(&self.resources)
            .iter()
            .filter(|r| kinds.contains(&r.kind))
            .cloned()
            .collect())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Attributes, RemoteRef};
    use serde_json::json;

    fn observed(kind: ResourceKind, name: &str) -> ObservedResource {
        ObservedResource::new(kind, name, Attributes::new(), RemoteRef::new(json!(name)))
    }

    #[test]
    fn test_mock_source_filters_kinds() {
        let source = MockSource::new();
        source.add(observed(ResourceKind::Role, "admin"));
        source.add(observed(ResourceKind::Index, "by_name"));

        let roles = source.fetch(&[ResourceKind::Role]).unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].name, "admin");
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn test_mock_source_failure() {
        let source = MockSource::new();
        source.fail_with("unauthorized");

        let err = source.fetch(&ResourceKind::ALL).unwrap_err();
        assert_eq!(err.to_string(), "unauthorized");
    }

    #[test]
    fn test_boxed_source() {
        let source = MockSource::new();
        source.add(observed(ResourceKind::Collection, "events"));
        let boxed: Box<dyn SchemaSource> = Box::new(source.clone());

        assert_eq!(boxed.fetch(&ResourceKind::ALL).unwrap().len(), 1);
        assert_eq!(source.calls(), 1);
    }
}
