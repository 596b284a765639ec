//! Sink replies: a branch's terminal-stage outputs.
//!
//! There is no explicit terminal-stage marker in an engine report, so every
//! result at the maximum observed stage index counts as a sink. Branches
//! whose errored stages report stale indices are taken as reported.

use crate::core::string::{clip_line, quote_inline};
use crate::engine::{ExecutionReport, is_echo_output};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Length of the fingerprint prefix shown in handoffs, requests and consoles.
pub const SHORT_FINGERPRINT_LEN: usize = 12;

/// Budget ceiling for echo-backend outputs
pub const ECHO_OUTPUT_MAX_CHARS: usize = 240;

/// One terminal reply of a branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkReply {
    pub agent: String,
    pub text: String,
    pub error: Option<String>,
}

/// Results at the maximum stage index, in report order.
///
/// A report whose results all share one stage yields all of them; a single
/// result yields itself.
pub fn sink_replies(report: &ExecutionReport) -> Vec<SinkReply> {
    let Some(max_stage) = report.results.iter().map(|r| r.stage_index).max() else {
        return Vec::new();
    };

    report
        .results
        .iter()
        .filter(|r| r.stage_index == max_stage)
        .map(|r| SinkReply {
            agent: r.agent.clone(),
            text: r.output.clone(),
            error: r.error.clone(),
        })
        .collect()
}

/// SHA-256 over the JSON serialization of the ordered sink list, hex-encoded.
pub fn sink_fingerprint(sinks: &[SinkReply]) -> String {
    let encoded = serde_json::to_vec(sinks).unwrap_or_default();
    hex::encode(Sha256::digest(&encoded))
}

pub fn short_fingerprint(fingerprint: &str) -> &str {
    match fingerprint.get(..SHORT_FINGERPRINT_LEN) {
        Some(prefix) => prefix,
        None => fingerprint,
    }
}

/// Clip a sink text to `max_chars`, capping echo-backend output further.
pub fn clip_sink_text(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    let max_chars = if is_echo_output(text) && max_chars > ECHO_OUTPUT_MAX_CHARS {
        ECHO_OUTPUT_MAX_CHARS
    } else {
        max_chars
    };
    clip_line(text, max_chars)
}

/// Append the `sink_outputs:` entries shared by handoff blocks and judge requests.
pub fn render_sink_outputs(lines: &mut Vec<String>, sinks: &[SinkReply], max_chars: usize) {
    lines.push("  sink_outputs:".to_string());
    if sinks.is_empty() {
        lines.push("    - agent: none".to_string());
        lines.push("      text: \"\"".to_string());
        return;
    }
    for sink in sinks {
        lines.push(format!("    - agent: {}", sink.agent));
        if let Some(err) = sink.error.as_deref().filter(|e| !e.is_empty()) {
            lines.push(format!("      error: {}", quote_inline(err)));
            continue;
        }
        lines.push("      text: |".to_string());
        for line in clip_sink_text(&sink.text, max_chars).split('\n') {
            lines.push(format!("        {}", line));
        }
    }
}
