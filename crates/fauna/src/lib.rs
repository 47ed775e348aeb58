//! # Fauna
//!
//! Client side of schema reconciliation against a Fauna database: connection
//! configuration, the HTTP transport, the schema listing query, and plan
//! execution.
//!
//! [`Client`] implements [`reconcile::SchemaSource`], so it plugs straight
//! into a [`reconcile::Session`]:
//!
//! ```
//! use fauna::Client;
//! use fauna::transport::MockTransport;
//! use reconcile::Session;
//! use serde_json::json;
//!
//! let transport = MockTransport::new();
//! transport.push_ok(json!({"roles": [], "collections": [], "functions": [], "indexes": []}));
//!
//! let mut session = Session::new(Client::with_transport(transport, 100));
//! session.register_collection("users", &json!({}))?;
//! session.load_schema()?;
//! assert_eq!(session.diff()?.len(), 1);
//! # Ok::<(), reconcile::Error>(())
//! ```

pub mod config;
pub mod decode;
pub mod error;
pub mod executor;
pub mod query;
pub mod transport;

pub use config::{ClientConfig, Scheme};
pub use error::{Error, ErrorCategory, Result};
pub use executor::{
    ActionOutcome, ApplyReport, ApplyResult, ApplySummary, NoProgress, ProgressCallback, execute,
};
pub use transport::{HttpTransport, MockTransport, Transport};

use reconcile::{ActionPlan, ObservedResource, ResourceKind, SchemaSource, SourceError};

/// Database client: fetches the schema and applies plans.
pub struct Client {
    transport: Box<dyn Transport>,
    page_size: u32,
}

impl Client {
    /// Connect over HTTP using `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        log::debug!("client for {}", transport.endpoint());
        Ok(Self::with_transport(transport, config.page_size))
    }

    /// Use a custom transport.
    pub fn with_transport(transport: impl Transport + 'static, page_size: u32) -> Self {
        Self {
            transport: Box::new(transport),
            page_size,
        }
    }

    /// Fetch every resource of the given kinds in one query.
    pub fn fetch_schema(&self, kinds: &[ResourceKind]) -> Result<Vec<ObservedResource>> {
        let expr = query::schema_query(kinds, self.page_size);
        let resource = self.transport.query(&expr)?;
        let observed = decode::observed_resources(&resource, kinds)?;

        // A full page may hide more resources; a partial listing must never be diffed.
        for kind in kinds {
            let count = observed.iter().filter(|r| r.kind == *kind).count();
            if count >= self.page_size as usize {
                log::warn!("{} listing filled a whole page ({count})", kind.plural());
                return Err(Error::InvalidResponse(format!(
                    "{} listing may be truncated at page size {}; raise --page-size",
                    kind.plural(),
                    self.page_size
                )));
            }
        }
        Ok(observed)
    }

    /// Apply `plan` action by action. Failures are reported, not raised.
    pub fn apply<P: ProgressCallback>(&self, plan: &ActionPlan, progress: &mut P) -> ApplyReport {
        execute(self.transport.as_ref(), plan, progress)
    }
}

impl SchemaSource for Client {
    fn fetch(&self, kinds: &[ResourceKind]) -> std::result::Result<Vec<ObservedResource>, SourceError> {
        self.fetch_schema(kinds).map_err(SourceError::from)
    }
}
