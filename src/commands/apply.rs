use anyhow::{Result, bail};
use colored::Colorize;

use super::{connect, reconcile};
use crate::Context;
use crate::cli::{ApplyArgs, ConnectionArgs};
use crate::progress::ApplyProgress;
use crate::{desired, display, ui};

pub fn run(ctx: &Context, conn: &ConnectionArgs, args: ApplyArgs) -> Result<()> {
    let declared = desired::load(&args.manifest)?;
    let client = connect(conn)?;
    let (plan, client) = reconcile(client, declared, args.kind)?;

    display::print_plan(&plan);
    if plan.is_empty() {
        return Ok(());
    }

    if args.dry_run {
        println!();
        ui::info("Dry run - no changes made");
        return Ok(());
    }

    if !args.yes && !confirm_proceed()? {
        println!();
        println!("  {} Aborted", "✗".red());
        return Ok(());
    }

    println!();
    println!("  {} Applying {} actions...", "→".cyan(), plan.len());

    let mut progress = ApplyProgress::new(ctx.quiet);
    let report = client.apply(&plan, &mut progress);
    display::print_report(&report);

    if !report.summary.is_success() {
        bail!(
            "{} of {} actions failed",
            report.summary.failed,
            report.outcomes.len()
        );
    }
    Ok(())
}

/// Confirm with user
fn confirm_proceed() -> Result<bool> {
    use dialoguer::Confirm;

    let confirmed = Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()?;

    Ok(confirmed)
}
