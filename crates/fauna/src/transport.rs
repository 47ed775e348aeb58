//! Query transports.
//!
//! [`HttpTransport`] posts expressions to the database endpoint.
//! [`MockTransport`] records expressions and replays canned results, for
//! testing without network access:
//!
//! ```
//! use fauna::transport::{MockTransport, Transport};
//! use serde_json::json;
//!
//! let mock = MockTransport::new();
//! mock.push_ok(json!({"roles": []}));
//!
//! let result = mock.query(&json!({"paginate": {"roles": null}})).unwrap();
//! assert_eq!(result, json!({"roles": []}));
//! assert_eq!(mock.queries().len(), 1);
//! ```

use crate::config::ClientConfig;
use crate::decode::{QueryResponse, service_error};
use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Something that can evaluate a query expression.
pub trait Transport: Send + Sync {
    /// Evaluate `expr` and return the `resource` part of the response.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` when no response arrives and
    /// `Error::Service` when the service rejects the query.
    fn query(&self, expr: &Value) -> Result<Value>;
}

/// HTTP transport backed by a `ureq` agent.
pub struct HttpTransport {
    agent: ureq::Agent,
    endpoint: String,
    authorization: String,
}

impl HttpTransport {
    /// Create a transport for the given configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .max_idle_connections(if config.keep_alive { 10 } else { 0 })
            .build();

        Ok(Self {
            agent: ureq::Agent::new_with_config(agent_config),
            endpoint: config.endpoint(),
            authorization: format!("Bearer {}", config.secret),
        })
    }

    /// Endpoint queries are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    fn query(&self, expr: &Value) -> Result<Value> {
        log::trace!("POST {} {}", self.endpoint, expr);

        let mut response = self
            .agent
            .post(&self.endpoint)
            .header("Authorization", &self.authorization)
            .header("User-Agent", "fauna-sync")
            .header("X-FaunaDB-API-Version", "4")
            .send_json(expr)?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;

        if !(200..300).contains(&status) {
            return Err(service_error(status, &body));
        }

        let parsed: QueryResponse = serde_json::from_str(&body)?;
        Ok(parsed.resource)
    }
}

/// In-memory transport for tests.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    queries: Arc<Mutex<Vec<Value>>>,
    responses: Arc<Mutex<VecDeque<Result<Value>>>>,
}

impl MockTransport {
    /// Create a mock with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful result.
    pub fn push_ok(&self, resource: Value) {
        lock(&self.responses).push_back(Ok(resource));
    }

    /// Queue a failure.
    pub fn push_err(&self, error: Error) {
        lock(&self.responses).push_back(Err(error));
    }

    /// Every expression received so far, oldest first.
    #[must_use]
    pub fn queries(&self) -> Vec<Value> {
        lock(&self.queries).clone()
    }
}

impl Transport for MockTransport {
    fn query(&self, expr: &Value) -> Result<Value> {
        lock(&self.queries).push(expr.clone());
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Err(Error::Transport("no mock response queued".to_string())))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
