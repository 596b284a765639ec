//! CLI entrypoint for multiverse
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use multiverse_application::{
    MultiverseParams, MultiverseProgressNotifier, NoProgress, NoRunLogger, RunJudgeUseCase,
    RunLogger, RunMultiverseUseCase, TraceMultiverseUseCase,
};
use multiverse_domain::{ConsensusReport, OutputFormat, Universe, UniverseSetBuilder};
use multiverse_infrastructure::{ConfigLoader, EchoEngine, FileConfig, JsonlRunLogger};
use multiverse_presentation::{Cli, Command, ConsoleFormatter, ProgressReporter, RunArgs, SimpleProgress};
use std::io::IsTerminal;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Exit status for a run interrupted with Ctrl+C
const EXIT_CANCELLED: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!("failed to load config: {}", e))?
    };
    for issue in config.ensure_valid()? {
        warn!("{}", issue.message);
    }
    if !config.output.color {
        ConsoleFormatter::set_color_enabled(false);
    }

    let Some(command) = cli.command else {
        bail!("a subcommand is required: `multiverse run` or `multiverse trace` (see --help)");
    };

    match command {
        Command::Trace(args) => trace(&config, &args).await,
        Command::Run(args) => run(&config, &args, cli.quiet).await,
    }
}

/// Resolve flags and config into run parameters and a universe set
fn prepare(config: &FileConfig, args: &RunArgs) -> Result<(MultiverseParams, Vec<Universe>)> {
    let params = args.apply_to(config.multiverse.apply_to(MultiverseParams::default()));

    let mut builder = UniverseSetBuilder::new(args.spec.as_str(), args.input_text());
    if let Some(name) = &params.preset {
        builder = builder.with_preset(config.preset(name)?);
    }

    let universes = builder
        .build(params.branches)?
        .with_context(|| format!("a multiverse run needs at least 2 universes (got --multiverse {})", params.branches))?;

    info!("Prepared {} universes", universes.len());
    Ok((params, universes))
}

fn output_format(config: &FileConfig, args: &RunArgs) -> OutputFormat {
    args.output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default()
}

async fn trace(config: &FileConfig, args: &RunArgs) -> Result<()> {
    let (_, universes) = prepare(config, args)?;
    let engine = Arc::new(EchoEngine::new());

    let trace = TraceMultiverseUseCase::new(engine).execute(&universes).await?;

    let output = match output_format(config, args) {
        OutputFormat::Text => ConsoleFormatter::format_trace(&trace),
        OutputFormat::Json => ConsoleFormatter::format_trace_json(&trace),
    };
    println!("{}", output);
    Ok(())
}

async fn run(config: &FileConfig, args: &RunArgs, quiet: bool) -> Result<()> {
    let (params, universes) = prepare(config, args)?;
    let format = output_format(config, args);

    // === Dependency Injection ===
    let engine = Arc::new(EchoEngine::new());

    let run_logger: Arc<dyn RunLogger> = match &config.logging.run_log {
        Some(path) => match JsonlRunLogger::open(path) {
            Ok(logger) => {
                info!("Run log: {} ({})", logger.path().display(), logger.run_id());
                Arc::new(logger)
            }
            Err(e) => {
                warn!("Could not open run log {}: {}", path.display(), e);
                Arc::new(NoRunLogger)
            }
        },
        None => Arc::new(NoRunLogger),
    };

    let progress: Box<dyn MultiverseProgressNotifier> = if quiet {
        Box::new(NoProgress)
    } else if format == OutputFormat::Text && std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });

    let use_case = RunMultiverseUseCase::new(engine.clone())
        .with_cancellation(token)
        .with_run_logger(run_logger.clone());

    let run = match use_case.execute_with_progress(&universes, progress.as_ref()).await {
        Ok(run) => run,
        Err(e) if e.is_cancelled() => {
            eprintln!("{}", e);
            std::process::exit(EXIT_CANCELLED);
        }
        Err(e) => return Err(e.into()),
    };

    let consensus = ConsensusReport::from_branches(&run.branches);

    let judge = match &params.judge {
        Some(spec) => Some(
            RunJudgeUseCase::new(engine)
                .with_run_logger(run_logger)
                .execute_with_progress(
                    spec,
                    &args.spec,
                    &args.input_text(),
                    &run.branches,
                    params.judge_max_output_chars,
                    progress.as_ref(),
                )
                .await,
        ),
        None => None,
    };

    let output = match format {
        OutputFormat::Text => {
            let mut text = ConsoleFormatter::format_run(&run, &consensus);
            if let Some(judge) = &judge {
                text.push_str(&ConsoleFormatter::format_judge(judge));
            }
            text
        }
        OutputFormat::Json => ConsoleFormatter::format_run_json(&run, &consensus, judge.as_ref()),
    };
    println!("{}", output);
    Ok(())
}
