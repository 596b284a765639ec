//! Handoff edges between universes.

use crate::universe::{MergePolicy, Universe};
use serde::{Deserialize, Serialize};

/// One directed data edge from a source universe's output port to a
/// target universe's input port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handoff {
    pub from_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_label: Option<String>,
    pub from_port: String,
    pub to_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_label: Option<String>,
    pub to_port: String,
    /// Content kind inherited from the source's declared output kind
    pub kind: String,
    pub channel: String,
    /// Copied from the target universe
    pub merge_policy: MergePolicy,
    /// Copied from the target universe
    pub max_chars: usize,
    #[serde(skip)]
    pub(crate) from_index: usize,
    #[serde(skip)]
    pub(crate) to_index: usize,
}

impl Handoff {
    /// Materialize the edge `from -> to`. Both universes must be normalized.
    pub fn between(from: &Universe, to: &Universe) -> Self {
        let kind = from.output_kind.clone();
        Self {
            channel: channel_id(from, to, &kind),
            from_id: from.id.clone(),
            from_label: from.label.clone(),
            from_port: from.output_port.clone(),
            to_id: to.id.clone(),
            to_label: to.label.clone(),
            to_port: to.input_port.clone(),
            kind,
            merge_policy: to.merge_policy,
            max_chars: to.handoff_max_chars,
            from_index: from.index,
            to_index: to.index,
        }
    }

    pub fn from_index(&self) -> usize {
        self.from_index
    }

    pub fn to_index(&self) -> usize {
        self.to_index
    }
}

/// `"<src.id>.<src.out>-><dst.id>.<dst.in>#<kind>"`
pub fn channel_id(from: &Universe, to: &Universe, kind: &str) -> String {
    format!(
        "{}.{}->{}.{}#{}",
        from.id, from.output_port, to.id, to.input_port, kind
    )
}
