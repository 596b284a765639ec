//! Judge step
//!
//! One extra engine call compares all branches. The request is built by
//! [`build_judge_request`]; the free-form answer is recovered into a
//! [`JudgeDecision`] by [`parse_judge_decision`].

pub mod decision;
pub mod parsing;
pub mod request;

pub use decision::{DecisionFormat, JudgeDecision};
pub use parsing::{JudgeField, judge_field, normalize_judge_key, parse_judge_decision, section_field};
pub use request::{COMPARE_REQUEST_TAG, DEFAULT_JUDGE_BRANCH_CHARS, build_judge_request};
