use anyhow::Result;
use reconcile::Registry;
use std::path::Path;

use crate::Context;
use crate::{desired, display, ui};

/// Load a manifest offline and show what would be declared
pub fn run(ctx: &Context, manifest: &Path) -> Result<()> {
    let registry = registry_from(manifest)?;

    if !ctx.quiet {
        display::print_registry(&registry);
        println!();
    }
    ui::success(&format!(
        "{} is valid ({} resources)",
        manifest.display(),
        registry.len()
    ));
    Ok(())
}

fn registry_from(manifest: &Path) -> Result<Registry> {
    let mut registry = Registry::new();
    for resource in desired::load(manifest)? {
        registry.register(resource)?;
    }
    Ok(registry)
}
