//! Plan, report, and schema display

use crate::ui;
use colored::{ColoredString, Colorize};
use fauna::{ApplyReport, ApplyResult};
use reconcile::{ActionPlan, Registry, RemoteSchema, ResourceKind, Verb};

fn verb_symbol(verb: Verb) -> ColoredString {
    match verb {
        Verb::Create => "+".green(),
        Verb::Update => "~".yellow(),
        Verb::Delete => "-".red(),
    }
}

fn kind_title(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Role => "Roles",
        ResourceKind::Collection => "Collections",
        ResourceKind::Function => "Functions",
        ResourceKind::Index => "Indexes",
    }
}

/// Display an action plan grouped by kind
pub fn print_plan(plan: &ActionPlan) {
    if plan.is_empty() {
        println!();
        println!("  {} Schema is up to date", "✓".green());
        return;
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Schema Diff".bold()
    );
    println!("│");

    for kind in ResourceKind::ALL {
        let actions = plan.filter_kind(kind);
        if actions.is_empty() {
            continue;
        }
        println!("│ {}", kind_title(kind).bold());
        for action in &actions {
            let note = match action.verb() {
                Verb::Create => "(new)",
                Verb::Update => "(changed)",
                Verb::Delete => "(will remove)",
            };
            println!(
                "│   {} {:<30} {}",
                verb_symbol(action.verb()),
                action.name,
                note.dimmed()
            );
        }
        println!("│");
    }

    let summary = plan.summary();
    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Summary: {} changes ({} create, {} update, {} delete)",
        summary.total().to_string().bold(),
        summary.creates.to_string().green(),
        summary.updates.to_string().yellow(),
        summary.deletes.to_string().red()
    );
    println!("└─────────────────────────────────────────────────────┘");
}

/// Print final apply summary
pub fn print_report(report: &ApplyReport) {
    let summary = &report.summary;

    println!();
    if summary.is_success() {
        println!("  {} Schema applied successfully!", "✓".green().bold());
    } else {
        println!("  {} Schema applied with errors", "⚠".yellow().bold());
    }

    if summary.created > 0 {
        println!("    • {} resources created", summary.created);
    }
    if summary.updated > 0 {
        println!("    • {} resources updated", summary.updated);
    }
    if summary.deleted > 0 {
        println!("    • {} resources deleted", summary.deleted);
    }
    if summary.failed > 0 {
        println!("    • {} {} failed", summary.failed, "resources".red());
        for outcome in report.failures() {
            if let ApplyResult::Failed { error } = &outcome.result {
                println!(
                    "      {} {} {} {}: {}",
                    "✗".red(),
                    outcome.verb,
                    outcome.kind,
                    outcome.name,
                    error.dimmed()
                );
            }
        }
    }
}

/// Display the observed schema
pub fn print_schema(schema: &RemoteSchema) {
    ui::header("Remote Schema");

    for kind in ResourceKind::ALL {
        println!();
        println!(
            "{} ({})",
            kind_title(kind).cyan().bold(),
            schema.count(kind)
        );
        let Some(resources) = schema.all(kind) else {
            continue;
        };
        for resource in resources.values() {
            match resource.fingerprint() {
                Some(fp) => println!("  {:<30} {}", resource.name, ui::short(fp, 16).dimmed()),
                None => println!("  {:<30} {}", resource.name, "(unmanaged)".yellow()),
            }
        }
    }
}

/// Display declared resources with their fingerprints
pub fn print_registry(registry: &Registry) {
    ui::header("Declared Resources");

    for kind in ResourceKind::ALL {
        let Some(resources) = registry.all(kind) else {
            continue;
        };
        println!();
        println!("{} ({})", kind_title(kind).cyan().bold(), resources.len());
        for resource in resources.values() {
            println!(
                "  {:<30} {}",
                resource.name(),
                resource.fingerprint().unwrap_or("-").dimmed()
            );
        }
    }
}
