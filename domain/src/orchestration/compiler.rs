//! Compiles a universe's input from its completed upstream branches.
//!
//! The compiled block is line-oriented and stable; downstream models and
//! external tooling read it:
//!
//! ```text
//! [multiverse_handoffs]
//! kind: context/compiled
//! target: review (u3)
//! - channel: u1.result->u3.context#summary/text
//!   kind: summary/text
//!   from: "u1"
//!   status: ok
//!   sink_fingerprint: 3f2a9c01d4e7
//!   sink_outputs:
//!     - agent: writer
//!       text: |
//!         ...
//! ```

use super::branch::BranchResult;
use super::handoff::Handoff;
use super::plan::OrchestrationPlan;
use crate::consensus::{render_sink_outputs, short_fingerprint, sink_fingerprint, sink_replies};
use crate::core::kind::CONTEXT_COMPILED;
use crate::core::string::quote_inline;
use crate::universe::{MergePolicy, Universe};

pub const HANDOFF_BLOCK_TAG: &str = "[multiverse_handoffs]";

/// Input for one universe activation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInput {
    pub input: String,
    /// `"multiverse channels=<n> merge=<policy>"` when any upstream contributed
    pub note: Option<String>,
    /// Channel ids that contributed, in declaration order
    pub channels: Vec<String>,
    pub contributions: usize,
}

impl CompiledInput {
    fn unchanged(base: String) -> Self {
        Self {
            input: base,
            note: None,
            channels: Vec::new(),
            contributions: 0,
        }
    }
}

/// Compile the input of `target` against a snapshot of completed branches.
///
/// `done` and `branches` are indexed by declaration position. A source is
/// eligible only when it is done and its result carries no error.
pub fn compile_universe_input(
    plan: &OrchestrationPlan,
    target: &Universe,
    done: &[bool],
    branches: &[Option<BranchResult>],
) -> CompiledInput {
    let target = target.normalized();
    let base = target.input.trim().to_string();

    let contributing = |h: &&Handoff| -> bool {
        let i = h.from_index();
        done.get(i).copied().unwrap_or(false)
            && branches
                .get(i)
                .and_then(Option::as_ref)
                .is_some_and(BranchResult::is_ok)
    };

    let incoming = plan.incoming(target.index);
    let selected: Vec<&Handoff> = match target.merge_policy {
        MergePolicy::Append => incoming.iter().filter(contributing).collect(),
        MergePolicy::Latest => incoming.iter().rev().find(contributing).into_iter().collect(),
    };

    let mut lines = vec![
        HANDOFF_BLOCK_TAG.to_string(),
        format!("kind: {}", CONTEXT_COMPILED),
        format!("target: {}", target.display_name()),
    ];
    let mut channels = Vec::with_capacity(selected.len());

    for handoff in selected {
        let Some(source) = branches.get(handoff.from_index()).and_then(Option::as_ref) else {
            continue;
        };
        channels.push(handoff.channel.clone());
        render_channel(&mut lines, handoff, source);
    }

    if channels.is_empty() {
        return CompiledInput::unchanged(base);
    }

    let block = lines.join("\n");
    let input = if base.is_empty() {
        block
    } else {
        format!("{}\n\n{}", base, block)
    };
    CompiledInput {
        input,
        note: Some(format!(
            "multiverse channels={} merge={}",
            channels.len(),
            target.merge_policy
        )),
        contributions: channels.len(),
        channels,
    }
}

fn render_channel(lines: &mut Vec<String>, handoff: &Handoff, source: &BranchResult) {
    lines.push(format!("- channel: {}", handoff.channel));
    lines.push(format!("  kind: {}", handoff.kind));
    lines.push(format!("  from: {}", quote_inline(&source.universe.display_name())));
    lines.push(format!("  status: {}", source.status()));

    let sinks = source.report.as_ref().map(sink_replies).unwrap_or_default();
    let fingerprint = sink_fingerprint(&sinks);
    lines.push(format!("  sink_fingerprint: {}", short_fingerprint(&fingerprint)));
    render_sink_outputs(lines, &sinks, handoff.max_chars);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{AgentRunResult, ExecutionReport};

    fn plan_with_policy(policy: MergePolicy) -> OrchestrationPlan {
        let universes = vec![
            Universe::new("u1", 0, "writer").with_label("u1"),
            Universe::new("u2", 1, "writer").with_label("u2"),
            Universe::new("u3", 2, "reviewer")
                .with_label("review")
                .with_input("check the drafts")
                .with_depends_on(["u1", "u2"])
                .with_merge_policy(policy),
        ];
        OrchestrationPlan::build(&universes).unwrap()
    }

    fn done_branch(plan: &OrchestrationPlan, index: usize, text: &str) -> Option<BranchResult> {
        let report = ExecutionReport::new("in", vec![AgentRunResult::success("writer", 0, text)]);
        Some(BranchResult::success(plan.universes()[index].clone(), report, 5))
    }

    #[test]
    fn test_append_includes_all_completed_sources() {
        let plan = plan_with_policy(MergePolicy::Append);
        let branches = vec![
            done_branch(&plan, 0, "draft from alpha"),
            done_branch(&plan, 1, "draft from beta"),
            None,
        ];
        let out = compile_universe_input(&plan, &plan.universes()[2], &[true, true, false], &branches);

        assert!(out.input.starts_with("check the drafts\n\n[multiverse_handoffs]\n"));
        assert!(out.input.contains("draft from alpha"));
        assert!(out.input.contains("draft from beta"));
        assert!(out.input.contains("kind: summary/text"));
        assert!(out.input.contains("target: review (u3)"));
        assert!(out.note.as_deref().unwrap().contains("channels=2"));
        assert_eq!(out.note.as_deref(), Some("multiverse channels=2 merge=append"));
        assert_eq!(out.contributions, 2);
        // declaration order, not completion order
        assert!(out.channels[0].starts_with("u1."));
        assert!(out.channels[1].starts_with("u2."));
    }

    #[test]
    fn test_latest_keeps_last_declared_source() {
        let plan = plan_with_policy(MergePolicy::Latest);
        let branches = vec![
            done_branch(&plan, 0, "draft from alpha"),
            done_branch(&plan, 1, "draft from beta"),
            None,
        ];
        let out = compile_universe_input(&plan, &plan.universes()[2], &[true, true, false], &branches);

        assert!(out.input.contains("draft from beta"));
        assert!(!out.input.contains("draft from alpha"));
        assert_eq!(out.channels.len(), 1);
        assert_eq!(out.note.as_deref(), Some("multiverse channels=1 merge=latest"));
    }

    #[test]
    fn test_latest_falls_back_to_earlier_completed() {
        let plan = plan_with_policy(MergePolicy::Latest);
        let branches = vec![done_branch(&plan, 0, "draft from alpha"), None, None];
        let out = compile_universe_input(&plan, &plan.universes()[2], &[true, false, false], &branches);
        assert!(out.input.contains("draft from alpha"));
        assert_eq!(out.contributions, 1);
    }

    #[test]
    fn test_failed_source_contributes_nothing() {
        let plan = plan_with_policy(MergePolicy::Append);
        let failed = BranchResult::failure(plan.universes()[0].clone(), "engine down", 1);
        let branches = vec![Some(failed), done_branch(&plan, 1, "draft from beta"), None];
        let out = compile_universe_input(&plan, &plan.universes()[2], &[true, true, false], &branches);

        assert!(!out.input.contains("engine down"));
        assert!(out.input.contains("draft from beta"));
        assert_eq!(out.contributions, 1);
    }

    #[test]
    fn test_no_completed_sources_returns_base() {
        let plan = plan_with_policy(MergePolicy::Append);
        let out = compile_universe_input(&plan, &plan.universes()[2], &[false; 3], &[None, None, None]);
        assert_eq!(out.input, "check the drafts");
        assert!(out.note.is_none());
        assert!(out.channels.is_empty());
    }

    #[test]
    fn test_empty_base_input_is_block_only() {
        let universes = vec![
            Universe::new("u1", 0, "writer"),
            Universe::new("u2", 1, "reviewer").with_depends_on(["u1"]),
        ];
        let plan = OrchestrationPlan::build(&universes).unwrap();
        let branches = vec![done_branch(&plan, 0, "hello"), None];
        let out = compile_universe_input(&plan, &plan.universes()[1], &[true, false], &branches);
        assert!(out.input.starts_with(HANDOFF_BLOCK_TAG));
        assert!(out.input.contains("  from: \"u1\""));
        assert!(out.input.contains("  sink_fingerprint: "));
        assert!(out.input.ends_with("        hello"));
    }

    #[test]
    fn test_handoff_budget_clips_sink_text() {
        let universes = vec![
            Universe::new("u1", 0, "writer"),
            Universe::new("u2", 1, "reviewer")
                .with_depends_on(["u1"])
                .with_handoff_max_chars(10),
        ];
        let plan = OrchestrationPlan::build(&universes).unwrap();
        let branches = vec![done_branch(&plan, 0, "a very long draft text"), None];
        let out = compile_universe_input(&plan, &plan.universes()[1], &[true, false], &branches);
        assert!(out.input.ends_with("        a very ..."));
    }
}
