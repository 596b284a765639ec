//! Consensus buckets: branches grouped by identical sink fingerprint.

use super::sink::{sink_fingerprint, sink_replies};
use crate::orchestration::BranchResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Branches whose sink replies hash identically
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusBucket {
    pub fingerprint: String,
    pub count: usize,
    /// Universe ids, in declaration order
    pub branches: Vec<String>,
}

/// How many branches agree, bucket by bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusReport {
    /// Largest first; ties broken by fingerprint
    pub buckets: Vec<ConsensusBucket>,
}

impl ConsensusReport {
    /// Group branches that produced sink replies.
    ///
    /// Errored branches and branches whose report has no results are left out.
    pub fn from_branches(branches: &[BranchResult]) -> Self {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for branch in branches {
            let Some(report) = branch.report.as_ref().filter(|_| branch.is_ok()) else {
                continue;
            };
            let sinks = sink_replies(report);
            if sinks.is_empty() {
                continue;
            }
            let fingerprint = sink_fingerprint(&sinks);
            grouped
                .entry(fingerprint)
                .or_default()
                .push(branch.universe.id.clone());
        }

        let mut buckets: Vec<ConsensusBucket> = grouped
            .into_iter()
            .map(|(fingerprint, branches)| ConsensusBucket {
                fingerprint,
                count: branches.len(),
                branches,
            })
            .collect();
        buckets.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.fingerprint.cmp(&b.fingerprint))
        });

        Self { buckets }
    }

    /// Size of the largest bucket
    pub fn agreement(&self) -> usize {
        self.buckets.first().map(|b| b.count).unwrap_or(0)
    }

    pub fn is_unanimous(&self) -> bool {
        self.buckets.len() == 1
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
