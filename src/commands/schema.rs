use anyhow::{Context as _, Result};
use reconcile::SchemaSnapshot;

use super::{connect, hint};
use crate::Context;
use crate::cache::{self, SchemaDump};
use crate::cli::{ConnectionArgs, SchemaArgs};
use crate::{display, ui};

pub fn run(ctx: &Context, conn: &ConnectionArgs, args: SchemaArgs) -> Result<()> {
    let client = connect(conn)?;
    let mut snapshot = SchemaSnapshot::new();
    let schema = match snapshot.load(&client) {
        Ok(schema) => schema,
        Err(e) => {
            hint(&e);
            return Err(e).context("Could not load the remote schema");
        }
    };

    if let Some(path) = &args.save {
        let path = cache::resolve_path(path.as_deref())?;
        let domain = conn.domain.clone().unwrap_or_default();
        SchemaDump::new(domain, schema.clone()).save(&path)?;
        if !ctx.quiet {
            ui::success(&format!(
                "Saved {} resources to {}",
                schema.len(),
                path.display()
            ));
        }
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(schema)?);
    } else {
        display::print_schema(schema);
    }
    Ok(())
}
