//! Progress bar for plan execution.

use colored::Colorize;
use fauna::{ApplyResult, ApplySummary, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use reconcile::Action;

/// Progress bar that reports failures inline
pub struct ApplyProgress {
    bar: ProgressBar,
}

impl ApplyProgress {
    /// Create the bar; hidden when `quiet`
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(0)
        };
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(style);
        Self { bar }
    }
}

impl ProgressCallback for ApplyProgress {
    fn on_start(&mut self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn on_action_start(&mut self, action: &Action) {
        self.bar.set_message(action.to_string());
    }

    fn on_action_complete(&mut self, action: &Action, result: &ApplyResult) {
        if let ApplyResult::Failed { error } = result {
            self.bar.suspend(|| {
                println!("  {} {} ({})", "✗".red(), action, error);
            });
        }
        self.bar.inc(1);
    }

    fn on_finish(&mut self, _summary: &ApplySummary) {
        self.bar.finish_and_clear();
    }
}
