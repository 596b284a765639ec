//! Cross-branch comparison request sent to the judge.

use crate::consensus::{render_sink_outputs, short_fingerprint, sink_fingerprint, sink_replies};
use crate::core::kind::{PLAN_SUMMARY, SUMMARY_TEXT};
use crate::core::string::{clip_line, quote_inline};
use crate::orchestration::BranchResult;

pub const COMPARE_REQUEST_TAG: &str = "[multiverse_compare_request]";

/// Per-branch sink budget used when the caller passes zero
pub const DEFAULT_JUDGE_BRANCH_CHARS: usize = 600;

const GOAL_MAX_CHARS: usize = 600;

const INSTRUCTIONS: &[&str] = &[
    "Compare multiverse branch outputs and choose the best branch for the goal.",
    "Be explicit about tradeoffs, risks, and why other branches were not selected.",
    "Return JSON when possible (preferred), otherwise use sections with exact labels.",
    r#"Preferred JSON shape: {"winner":"u1","rationale":"...","differences":["..."],"risks":["..."],"follow_up":["..."]}"#,
    "If uncertain, set winner to a branch id or label and explain uncertainty in rationale.",
];

/// Render the comparison request for `branches`.
pub fn build_judge_request(
    source_spec: &str,
    source_input: &str,
    branches: &[BranchResult],
    max_chars_per_branch: usize,
) -> String {
    let max_chars = match max_chars_per_branch {
        0 => DEFAULT_JUDGE_BRANCH_CHARS,
        n => n,
    };

    let mut lines = Vec::with_capacity(branches.len() * 8 + 16);
    lines.push(COMPARE_REQUEST_TAG.to_string());
    lines.push(format!("type: {}", PLAN_SUMMARY));
    if !source_spec.trim().is_empty() {
        lines.push(format!("source_spec: {}", source_spec));
    }
    if !source_input.trim().is_empty() {
        lines.push("goal:".to_string());
        lines.push(clip_line(source_input, GOAL_MAX_CHARS));
    }
    lines.push("instruction:".to_string());
    lines.extend(INSTRUCTIONS.iter().map(|s| s.to_string()));
    lines.push("branches:".to_string());

    for branch in branches {
        render_branch(&mut lines, branch, max_chars);
    }

    lines.push(format!("return_type_hint: {}", SUMMARY_TEXT));
    lines.join("\n")
}

fn render_branch(lines: &mut Vec<String>, branch: &BranchResult, max_chars: usize) {
    let u = &branch.universe;
    lines.push(format!("- id: {}", u.id));
    lines.push(format!("  label: {}", u.display_name()));
    lines.push(format!("  spec: {}", quote_inline(&u.spec)));
    if let Some(note) = u.input_note.as_deref().filter(|n| !n.is_empty()) {
        lines.push(format!("  input_note: {}", quote_inline(note)));
    }
    lines.push(format!("  duration_ms: {}", branch.duration_ms));
    lines.push(format!("  status: {}", branch.status()));
    if let Some(err) = branch.error.as_deref() {
        lines.push(format!("  error: {}", quote_inline(err)));
        return;
    }

    let sinks = branch.report.as_ref().map(sink_replies).unwrap_or_default();
    render_sink_outputs(lines, &sinks, max_chars);
    let fingerprint = sink_fingerprint(&sinks);
    lines.push(format!("  sink_fingerprint: {}", short_fingerprint(&fingerprint)));
}
