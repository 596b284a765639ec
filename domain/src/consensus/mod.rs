//! Consensus over branch outputs
//!
//! Each branch's terminal ("sink") replies are fingerprinted; branches with
//! identical fingerprints land in the same [`ConsensusBucket`].

pub mod aggregate;
pub mod sink;

pub use aggregate::{ConsensusBucket, ConsensusReport};
pub use sink::{
    ECHO_OUTPUT_MAX_CHARS, SHORT_FINGERPRINT_LEN, SinkReply, clip_sink_text, render_sink_outputs,
    short_fingerprint, sink_fingerprint, sink_replies,
};
