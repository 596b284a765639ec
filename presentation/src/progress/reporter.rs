//! Progress reporting for multiverse runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use multiverse_application::MultiverseProgressNotifier;
use multiverse_domain::{BranchResult, Universe};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Reports progress with an indicatif bar per run and a spinner for the judge
pub struct ProgressReporter {
    multi: MultiProgress,
    run_bar: Mutex<Option<ProgressBar>>,
    judge_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            run_bar: Mutex::new(None),
            judge_bar: Mutex::new(None),
        }
    }

    fn run_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn with_run_bar(&self, f: impl FnOnce(&ProgressBar)) {
        let guard = self.run_bar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pb) = guard.as_ref() {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiverseProgressNotifier for ProgressReporter {
    fn on_run_start(&self, total: usize) {
        let pb = self.multi.add(ProgressBar::new(total as u64));
        pb.set_style(Self::run_style());
        pb.set_prefix("Universes");
        pb.set_message("Starting...");
        pb.enable_steady_tick(Duration::from_millis(120));
        *self.run_bar.lock().unwrap_or_else(PoisonError::into_inner) = Some(pb);
    }

    fn on_branch_start(&self, universe: &Universe) {
        self.with_run_bar(|pb| pb.set_message(format!("running {}", universe.display_name())));
    }

    fn on_branch_complete(&self, branch: &BranchResult) {
        self.with_run_bar(|pb| {
            let name = branch.universe.display_name();
            let status = if branch.is_ok() {
                format!("{} {}", "v".green(), name)
            } else {
                format!("{} {}", "x".red(), name)
            };
            pb.set_message(status);
            pb.inc(1);
        });
    }

    fn on_run_complete(&self, branches: &[BranchResult]) {
        if let Some(pb) = self.run_bar.lock().unwrap_or_else(PoisonError::into_inner).take() {
            let failed = branches.iter().filter(|b| !b.is_ok()).count();
            let message = if failed == 0 {
                "all universes complete".green().to_string()
            } else {
                format!("{} failed", failed).yellow().to_string()
            };
            pb.finish_with_message(message);
        }
    }

    fn on_judge_start(&self, spec: &str) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix("Judge");
        pb.set_message(spec.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        *self.judge_bar.lock().unwrap_or_else(PoisonError::into_inner) = Some(pb);
    }

    fn on_judge_complete(&self, success: bool) {
        if let Some(pb) = self.judge_bar.lock().unwrap_or_else(PoisonError::into_inner).take() {
            let message = if success { "done".green() } else { "failed".red() };
            pb.finish_with_message(message.to_string());
        }
    }
}

/// Simple line-based progress on stderr (no fancy UI)
pub struct SimpleProgress;

impl MultiverseProgressNotifier for SimpleProgress {
    fn on_run_start(&self, total: usize) {
        eprintln!("{} {} ({} universes)", "->".cyan(), "Multiverse run".bold(), total);
    }

    fn on_branch_start(&self, universe: &Universe) {
        eprintln!("  {} {}", "..".dimmed(), universe.display_name());
    }

    fn on_branch_complete(&self, branch: &BranchResult) {
        let name = branch.universe.display_name();
        if branch.is_ok() {
            eprintln!("  {} {} ({}ms)", "v".green(), name, branch.duration_ms);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), name);
        }
    }

    fn on_judge_start(&self, spec: &str) {
        eprintln!("{} {} {}", "->".cyan(), "Judge".bold(), spec);
    }

    fn on_judge_complete(&self, success: bool) {
        if !success {
            eprintln!("  {} judge failed", "x".red());
        }
    }
}
