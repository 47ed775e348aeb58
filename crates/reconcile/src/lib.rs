//! # Reconcile
//!
//! Reconciliation of declared schema resources (roles, collections,
//! functions, indexes) against the live schema of a remote database.
//!
//! ## Core Concepts
//!
//! - **Registry**: the desired state, one [`DeclaredResource`] per kind and name
//! - **Fingerprint**: a hash of a declared payload, stored alongside it remotely
//! - **RemoteSchema**: the observed state, loaded once per session
//! - **diff**: compares the two and emits an ordered [`ActionPlan`]
//!
//! ## Example
//!
//! ```
//! use reconcile::{MockSource, Session};
//! use serde_json::json;
//!
//! let mut session = Session::new(MockSource::new());
//! session.register_role("admin", &json!({"privileges": []}))?;
//! session.register_collection("users", &json!({"history_days": 30}))?;
//!
//! session.load_schema()?;
//! let plan = session.diff()?;
//!
//! for action in &plan {
//!     println!("{action}");
//! }
//! assert_eq!(plan.summary().creates, 2);
//! # Ok::<(), reconcile::Error>(())
//! ```
//!
//! Executing the plan is left to the caller: each action is independent and
//! carries the payload the remote service needs.

pub mod diff;
pub mod error;
pub mod fingerprint;
pub mod kind;
pub mod plan;
pub mod registry;
pub mod resource;
pub mod session;
pub mod snapshot;
pub mod source;

// Re-export main types at crate root
pub use diff::diff;
pub use error::{Error, Result, SourceError};
pub use fingerprint::fingerprint;
pub use kind::ResourceKind;
pub use plan::{Action, ActionPlan, Operation, PlanSummary, Verb};
pub use registry::Registry;
pub use resource::{Attributes, DeclaredResource, ObservedResource, RemoteRef};
pub use session::Session;
pub use snapshot::{RemoteSchema, SchemaSnapshot};
pub use source::{MockSource, SchemaSource};
