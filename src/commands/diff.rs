use anyhow::Result;

use super::{connect, reconcile};
use crate::Context;
use crate::cache::{self, CachedSource, SchemaDump};
use crate::cli::{ConnectionArgs, DiffArgs};
use crate::{desired, display, ui};

pub fn run(ctx: &Context, conn: &ConnectionArgs, args: DiffArgs) -> Result<()> {
    let declared = desired::load(&args.manifest)?;

    let plan = match &args.from_cache {
        Some(path) => {
            let path = cache::resolve_path(path.as_deref())?;
            let dump = SchemaDump::load(&path)?;
            if !ctx.quiet && !args.json {
                ui::dim(&format!(
                    "Using schema from {} (fetched {} from {})",
                    path.display(),
                    dump.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    dump.domain
                ));
            }
            reconcile(CachedSource::new(dump), declared, args.kind)?.0
        }
        None => reconcile(connect(conn)?, declared, args.kind)?.0,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        display::print_plan(&plan);
    }
    Ok(())
}
