//! Run defaults from TOML (`[multiverse]` section)

use multiverse_application::MultiverseParams;
use serde::{Deserialize, Serialize};

/// Raw run defaults; every field is optional so CLI flags can override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMultiverseConfig {
    /// Branch count (0 = every universe the preset declares)
    pub branches: Option<i64>,
    /// Judge spec run after all branches finish
    pub judge: Option<String>,
    /// Per-branch sink budget in the judge request
    pub judge_max_output_chars: Option<usize>,
}

impl FileMultiverseConfig {
    /// Apply configured values on top of `params`.
    pub fn apply_to(&self, mut params: MultiverseParams) -> MultiverseParams {
        if let Some(branches) = self.branches {
            params = params.with_branches(branches);
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
