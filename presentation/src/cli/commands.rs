//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use multiverse_application::MultiverseParams;
use std::path::PathBuf;

/// Output format for run and trace results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable console output
    Text,
    /// JSON payload
    Json,
}

impl From<OutputFormat> for multiverse_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => multiverse_domain::OutputFormat::Text,
            OutputFormat::Json => multiverse_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for multiverse
#[derive(Parser, Debug)]
#[command(name = "multiverse")]
#[command(author, version, about = "Run one task as several concurrent universes and reconcile them")]
#[command(long_about = r#"
Multiverse runs the same task as several concurrent universes, wires the
results of some universes into the inputs of others, and reconciles the
outcomes through a consensus report and an optional judge.

Specs use `>` to separate stages and `+` to separate agents in a stage,
e.g. `planner>coder+tester`.

Configuration files are loaded from (in priority order):
1. --config <path>          Explicit config file
2. ./multiverse.toml        Project-level config
3. ~/.config/multiverse/config.toml   Global config

Example:
  multiverse run writer "Draft a release note" --multiverse 3
  multiverse run writer "Draft a release note" --preset review --judge reviewer
  multiverse trace writer "Draft a release note" --preset review
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long, global = true)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute every universe and reconcile the results
    Run(RunArgs),
    /// Show the orchestration plan and per-universe engine plans without executing
    Trace(RunArgs),
}

/// Arguments shared by `run` and `trace`
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Base spec for cloned universes and preset universes without one
    pub spec: String,

    /// Task input (joined with spaces)
    pub input: Vec<String>,

    /// Number of universes (0 = every universe the preset declares)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub multiverse: Option<i64>,

    /// Preset providing declared universes
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Spec used to judge the branch results
    #[arg(long, value_name = "SPEC")]
    pub judge: Option<String>,

    /// Per-branch sink budget in the judge request
    #[arg(long, value_name = "N")]
    pub judge_max_output_chars: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

impl RunArgs {
    pub fn input_text(&self) -> String {
        self.input.join(" ")
    }

    /// Apply explicit flags on top of configured parameters.
    pub fn apply_to(&self, mut params: MultiverseParams) -> MultiverseParams {
        if let Some(branches) = self.multiverse {
            params = params.with_branches(branches);
        }
        if let Some(preset) = &self.preset {
            params = params.with_preset(preset.trim());
        }
        if let Some(judge) = &self.judge {
            params = params.with_judge(judge.as_str());
        }
        if let Some(max) = self.judge_max_output_chars {
            params = params.with_judge_max_output_chars(max);
        }
        params
    }
}
