pub mod apply;
pub mod config;
pub mod diff;
pub mod schema;
pub mod validate;

use crate::cli::ConnectionArgs;
use crate::ui;
use anyhow::{Context as _, Result};
use fauna::Client;
use reconcile::{ActionPlan, DeclaredResource, ResourceKind, SchemaSource, Session};

/// Connect to the database described by the connection flags
pub fn connect(conn: &ConnectionArgs) -> Result<Client> {
    let config = conn.client_config();
    config.validate().map_err(|e| {
        ui::dim(e.category().advice());
        e
    })?;
    log::info!("Connecting to {}", config.endpoint());
    Ok(Client::new(&config)?)
}

/// Register `declared`, load the schema from `source` once, and plan.
///
/// Gives the source back so the same client can execute the plan.
pub fn reconcile<S: SchemaSource>(
    source: S,
    declared: Vec<DeclaredResource>,
    kind: Option<ResourceKind>,
) -> Result<(ActionPlan, S)> {
    let mut session = Session::new(source);
    for resource in declared {
        session.register_declared(resource)?;
    }

    if let Err(e) = session.load_schema() {
        hint(&e);
        return Err(e).context("Could not load the remote schema");
    }

    let plan = session.diff()?;
    let plan = match kind {
        Some(kind) => plan.filter_kind(kind),
        None => plan,
    };
    Ok((plan, session.into_source()))
}

/// Print advice for client errors hidden inside a remote failure
fn hint(err: &reconcile::Error) {
    if let reconcile::Error::Remote(source) = err {
        if let Some(client_err) = source.downcast_ref::<fauna::Error>() {
            let category = client_err.category();
            ui::dim(&format!("{}: {}", category.description(), category.advice()));
        }
    }
}
