//! Console output formatter for multiverse results

use colored::Colorize;
use multiverse_application::{JudgeRun, MultiverseRun, MultiverseTrace, TraceBranch};
use multiverse_domain::{
    BranchResult, ConsensusReport, Handoff, OrchestrationPlan, clip_line, is_echo_output,
    short_fingerprint, sink_replies,
};
use multiverse_domain::consensus::clip_sink_text;
use serde::Serialize;

/// Budget for each sink reply in run text
pub const RUN_SINK_MAX_CHARS: usize = 320;

/// Budget for echo output shown as raw judge text
pub const JUDGE_ECHO_MAX_CHARS: usize = 700;

/// JSON payload for `run --output json`
#[derive(Serialize)]
struct RunPayload<'a> {
    scheduler: &'a str,
    handoffs: &'a [Handoff],
    branches: &'a [BranchResult],
    consensus: &'a ConsensusReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    judge: Option<&'a JudgeRun>,
}

/// Formats multiverse results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colors off (or back to terminal detection)
    pub fn set_color_enabled(enabled: bool) {
        if enabled {
            colored::control::unset_override();
        } else {
            colored::control::set_override(false);
        }
    }

    /// Format a completed run with its consensus report
    pub fn format_run(run: &MultiverseRun, consensus: &ConsensusReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Multiverse Results"));
        output.push('\n');
        output.push_str(&Self::plan_summary(&run.plan));

        for branch in &run.branches {
            output.push_str(&Self::format_branch(branch));
        }

        output.push_str(&Self::format_consensus(consensus, run.branches.len()));
        output.push_str(&Self::footer());
        output
    }

    fn plan_summary(plan: &OrchestrationPlan) -> String {
        format!(
            "{} {} ({} universes, {} handoffs)\n",
            "Scheduler:".cyan().bold(),
            plan.scheduler,
            plan.len(),
            plan.handoffs.len()
        )
    }

    fn format_branch(branch: &BranchResult) -> String {
        let universe = &branch.universe;
        let title = format!("── {} ──", universe.display_name());
        let mut output = if branch.is_ok() {
            format!("\n{} {} {}ms\n", title.yellow().bold(), "ok".green(), branch.duration_ms)
        } else {
            format!("\n{} {} {}ms\n", title.red().bold(), "error".red(), branch.duration_ms)
        };

        output.push_str(&format!("  {} {}\n", "spec:".dimmed(), universe.spec));
        if let Some(preset) = &universe.preset_name {
            output.push_str(&format!("  {} {}\n", "preset:".dimmed(), preset));
        }
        if let Some(note) = &universe.input_note {
            output.push_str(&format!("  {} {}\n", "input:".dimmed(), note));
        }
        for channel in &branch.incoming_channels {
            output.push_str(&format!("  {} {}\n", "channel:".dimmed(), channel));
        }

        if let Some(error) = &branch.error {
            output.push_str(&format!("  {} {}\n", "Error:".red(), error));
            return output;
        }

        let sinks = branch.report.as_ref().map(sink_replies).unwrap_or_default();
        if sinks.is_empty() {
            output.push_str(&format!("  {}\n", "(no output)".dimmed()));
        }
        for sink in &sinks {
            match &sink.error {
                Some(error) => output.push_str(&format!("  [{}] {} {}\n", sink.agent, "error:".red(), error)),
                None => output.push_str(&format!(
                    "  [{}] {}\n",
                    sink.agent,
                    clip_sink_text(&sink.text, RUN_SINK_MAX_CHARS)
                )),
            }
        }
        output
    }

    /// Format consensus buckets, largest first
    pub fn format_consensus(consensus: &ConsensusReport, total: usize) -> String {
        let mut output = Self::section_header("Consensus");
        if consensus.is_empty() {
            output.push_str(&format!("  {}\n", "no successful branches".dimmed()));
            return output;
        }

        for bucket in &consensus.buckets {
            output.push_str(&format!(
                "  {}/{}  {}  {}\n",
                bucket.count,
                total,
                short_fingerprint(&bucket.fingerprint).yellow(),
                bucket.branches.join(", ")
            ));
        }
        if consensus.is_unanimous() && consensus.agreement() == total {
            output.push_str(&format!("  {}\n", "all branches agree".green()));
        }
        output
    }

    /// Format the judge step
    pub fn format_judge(judge: &JudgeRun) -> String {
        let mut output = Self::section_header("Judge");
        output.push_str(&format!("  {} {}\n", "spec:".dimmed(), judge.spec));

        if let Some(error) = &judge.error {
            output.push_str(&format!("  {} {}\n", "Error:".red(), error));
            return output;
        }

        let Some(decision) = &judge.decision else {
            let raw = if is_echo_output(&judge.raw_output) {
                clip_line(&judge.raw_output, JUDGE_ECHO_MAX_CHARS)
            } else {
                judge.raw_output.clone()
            };
            output.push_str(&format!("  {}\n{}\n", "Raw output:".cyan(), Self::indent(&raw, "    ")));
            return output;
        };

        if !decision.winner.is_empty() {
            output.push_str(&format!("  {} {}\n", "Winner:".green().bold(), decision.winner));
        }
        if !decision.rationale.is_empty() {
            output.push_str(&format!("  {} {}\n", "Rationale:".cyan(), decision.rationale));
        }
        for (title, items) in [
            ("Differences:", &decision.differences),
            ("Risks:", &decision.risks),
            ("Follow-up:", &decision.follow_up),
        ] {
            if items.is_empty() {
                continue;
            }
            output.push_str(&format!("  {}\n", title.cyan()));
            for item in items {
                output.push_str(&format!("    * {}\n", item));
            }
        }
        output.push_str(&format!("  {} {}\n", "format:".dimmed(), decision.format));
        output
    }

    /// Format a trace
    pub fn format_trace(trace: &MultiverseTrace) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Multiverse Trace"));
        output.push('\n');
        output.push_str(&Self::plan_summary(&trace.plan));

        if !trace.plan.handoffs.is_empty() {
            output.push_str(&Self::section_header("Handoffs"));
            for handoff in &trace.plan.handoffs {
                output.push_str(&format!(
                    "  {} ({}, max {})\n",
                    handoff.channel, handoff.merge_policy, handoff.max_chars
                ));
            }
        }

        for branch in &trace.branches {
            output.push_str(&Self::format_trace_branch(branch));
        }

        output.push_str(&Self::footer());
        output
    }

    fn format_trace_branch(branch: &TraceBranch) -> String {
        let universe = &branch.universe;
        let mut output = format!("\n{}\n", format!("── {} ──", universe.display_name()).yellow().bold());
        output.push_str(&format!("  {} {}\n", "spec:".dimmed(), universe.spec));
        if !universe.depends_on.is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                "depends_on:".dimmed(),
                universe.depends_on.join(", ")
            ));
        }
        if let Some(note) = &universe.input_note {
            output.push_str(&format!("  {} {}\n", "input:".dimmed(), note));
        }

        if let Some(error) = &branch.error {
            output.push_str(&format!("  {} {}\n", "Error:".red(), error));
            return output;
        }
        if let Some(plan) = &branch.plan {
            let stages = plan
                .stages
                .iter()
                .map(|stage| format!("{}[{}]", stage.index, stage.agents.join(", ")))
                .collect::<Vec<_>>()
                .join(" -> ");
            output.push_str(&format!("  {} {}\n", "stages:".dimmed(), stages));
        }
        output.push_str(&format!("  {} {}\n", "tasks:".dimmed(), branch.tasks.len()));
        output
    }

    /// Format a run as JSON
    pub fn format_run_json(
        run: &MultiverseRun,
        consensus: &ConsensusReport,
        judge: Option<&JudgeRun>,
    ) -> String {
        let payload = RunPayload {
            scheduler: run.plan.scheduler.as_str(),
            handoffs: &run.plan.handoffs,
            branches: &run.branches,
            consensus,
            judge,
        };
        serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format a trace as JSON
    pub fn format_trace_json(trace: &MultiverseTrace) -> String {
        serde_json::to_string_pretty(trace).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
