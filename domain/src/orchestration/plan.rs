//! Orchestration plan: the validated dependency graph between universes.
//!
//! An edge `A -> B` means "B depends on A": A must complete before B is
//! started. The plan is built once per run and is read-only afterwards.

use super::handoff::Handoff;
use crate::core::error::DomainError;
use crate::universe::{Universe, ref_key};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// How the scheduler activates universes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerMode {
    /// No universe declares a dependency; everything starts at once
    #[default]
    Parallel,
    /// At least one dependency; activation is indegree-gated
    Dag,
}

impl SchedulerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulerMode::Parallel => "parallel",
            SchedulerMode::Dag => "dag",
        }
    }
}

impl std::fmt::Display for SchedulerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated, acyclic universe dependency graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestrationPlan {
    pub scheduler: SchedulerMode,
    /// All edges in declaration order (target order, then reference order)
    pub handoffs: Vec<Handoff>,
    #[serde(skip)]
    universes: Vec<Universe>,
    #[serde(skip)]
    indegree: Vec<usize>,
    #[serde(skip)]
    dependents: Vec<Vec<usize>>,
    #[serde(skip)]
    incoming: Vec<Vec<Handoff>>,
}

impl OrchestrationPlan {
    /// Normalize, resolve and validate `universes` into a plan.
    ///
    /// Each universe's `index` is reset to its position in the slice.
    pub fn build(universes: &[Universe]) -> Result<Self, DomainError> {
        let n = universes.len();
        let universes: Vec<Universe> = universes
            .iter()
            .enumerate()
            .map(|(i, u)| {
                let mut u = u.normalized();
                u.index = i;
                u
            })
            .collect();

        let by_ref = build_ref_index(&universes)?;

        let mut plan = Self {
            scheduler: SchedulerMode::Parallel,
            handoffs: Vec::new(),
            universes: Vec::new(),
            indegree: vec![0; n],
            dependents: vec![Vec::new(); n],
            incoming: vec![Vec::new(); n],
        };

        let mut seen_edges: HashSet<(usize, usize)> = HashSet::new();
        for (to, target) in universes.iter().enumerate() {
            if target.depends_on.is_empty() {
                continue;
            }
            plan.scheduler = SchedulerMode::Dag;

            for reference in &target.depends_on {
                let from = *by_ref.get(&ref_key(reference)).ok_or_else(|| {
                    DomainError::UnknownDependency {
                        universe: target.display_name(),
                        reference: reference.clone(),
                    }
                })?;
                if from == to {
                    return Err(DomainError::SelfDependency(target.display_name()));
                }
                if !seen_edges.insert((from, to)) {
                    continue;
                }

                let handoff = Handoff::between(&universes[from], target);
                plan.handoffs.push(handoff.clone());
                plan.incoming[to].push(handoff);
                plan.dependents[from].push(to);
                plan.indegree[to] += 1;
            }
        }

        plan.check_acyclic()?;
        plan.universes = universes;
        Ok(plan)
    }

    /// Kahn's algorithm over a copy of the indegree vector.
    fn check_acyclic(&self) -> Result<(), DomainError> {
        let mut remaining = self.indegree.clone();
        let mut queue: VecDeque<usize> = remaining
            .iter()
            .enumerate()
            .filter(|(_, deg)| **deg == 0)
            .map(|(i, _)| i)
            .collect();

        let mut visited = 0;
        while let Some(i) = queue.pop_front() {
            visited += 1;
            for &j in &self.dependents[i] {
                remaining[j] -= 1;
                if remaining[j] == 0 {
                    queue.push_back(j);
                }
            }
        }

        if visited != remaining.len() {
            return Err(DomainError::DependencyCycle);
        }
        Ok(())
    }

    /// Normalized universes, in declaration order
    pub fn universes(&self) -> &[Universe] {
        &self.universes
    }

    pub fn universe(&self, index: usize) -> Option<&Universe> {
        self.universes.get(index)
    }

    pub fn len(&self) -> usize {
        self.universes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.universes.is_empty()
    }

    /// Number of distinct upstream universes of `index`
    pub fn indegree(&self, index: usize) -> usize {
        self.indegree.get(index).copied().unwrap_or(0)
    }

    /// Copy of the full indegree vector
    pub fn indegrees(&self) -> Vec<usize> {
        self.indegree.clone()
    }

    /// Indices of the universes that depend on `index`
    pub fn dependents(&self, index: usize) -> &[usize] {
        self.dependents.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edges feeding `index`, in declaration order
    pub fn incoming(&self, index: usize) -> &[Handoff] {
        self.incoming.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Indices that can start immediately
    pub fn roots(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.indegree(i) == 0).collect()
    }
}

/// Map every id and label (case-insensitive) to its universe index.
fn build_ref_index(universes: &[Universe]) -> Result<HashMap<String, usize>, DomainError> {
    let mut by_ref = HashMap::with_capacity(universes.len() * 2);
    for (i, u) in universes.iter().enumerate() {
        let id = u.id.trim();
        if id.is_empty() {
            return Err(DomainError::MissingUniverseId(i));
        }
        if by_ref.insert(ref_key(id), i).is_some() {
            return Err(DomainError::DuplicateUniverseId(id.to_string()));
        }
        if let Some(label) = u.label() {
            let key = ref_key(label);
            if let Some(&j) = by_ref.get(&key)
                && j != i
            {
                return Err(DomainError::DuplicateUniverseLabel(label.to_string()));
            }
            by_ref.insert(key, i);
        }
    }
    Ok(by_ref)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::UniverseSetBuilder;

    fn universe(id: &str, index: usize, deps: &[&str]) -> Universe {
        Universe::new(id, index, "guide")
            .with_label(id)
            .with_depends_on(deps.iter().copied())
    }

    #[test]
    fn test_independent_universes_are_parallel() {
        let set = UniverseSetBuilder::new("guide", "task").build(3).unwrap().unwrap();
        let plan = OrchestrationPlan::build(&set).unwrap();
        assert_eq!(plan.scheduler, SchedulerMode::Parallel);
        assert!(plan.handoffs.is_empty());
        assert_eq!(plan.roots(), vec![0, 1, 2]);
    }

    #[test]
    fn test_fan_in_builds_channels() {
        let set = vec![
            universe("u1", 0, &[]),
            universe("u2", 1, &[]),
            universe("u3", 2, &["u1", "u2"]),
        ];
        let plan = OrchestrationPlan::build(&set).unwrap();

        assert_eq!(plan.scheduler, SchedulerMode::Dag);
        assert_eq!(plan.indegree(2), 2);
        assert_eq!(plan.handoffs.len(), 2);
        assert_eq!(plan.dependents(0), &[2]);
        assert_eq!(plan.dependents(1), &[2]);
        assert_eq!(plan.incoming(2).len(), 2);
        for h in &plan.handoffs {
            assert!(h.channel.contains("->u3.context"), "channel = {}", h.channel);
        }
        assert_eq!(plan.roots(), vec![0, 1]);
    }

    #[test]
    fn test_reference_by_label_case_insensitive() {
        let set = vec![
            Universe::new("u1", 0, "guide").with_label("Baseline"),
            Universe::new("u2", 1, "guide").with_depends_on([" baseline "]),
        ];
        let plan = OrchestrationPlan::build(&set).unwrap();
        assert_eq!(plan.indegree(1), 1);
        assert_eq!(plan.handoffs[0].from_id, "u1");
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let set = vec![
            Universe::new("u1", 0, "guide").with_label("base"),
            Universe::new("u2", 1, "guide").with_depends_on(["u1", "base"]),
        ];
        let plan = OrchestrationPlan::build(&set).unwrap();
        assert_eq!(plan.handoffs.len(), 1);
        assert_eq!(plan.indegree(1), 1);
    }

    #[test]
    fn test_two_node_cycle_rejected() {
        let set = vec![universe("a", 0, &["b"]), universe("b", 1, &["a"])];
        let err = OrchestrationPlan::build(&set).unwrap_err();
        assert!(err.is_cycle());
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_cycle_rejected_regardless_of_size() {
        for n in 2..8 {
            let set: Vec<Universe> = (0..n)
                .map(|i| {
                    let prev = format!("n{}", (i + n - 1) % n);
                    Universe::new(format!("n{}", i), i, "guide").with_depends_on([prev])
                })
                .collect();
            let err = OrchestrationPlan::build(&set).unwrap_err();
            assert!(err.is_cycle(), "n = {}", n);
        }
    }

    #[test]
    fn test_cycle_behind_valid_prefix_rejected() {
        let set = vec![
            universe("root", 0, &[]),
            universe("x", 1, &["root", "z"]),
            universe("y", 2, &["x"]),
            universe("z", 3, &["y"]),
        ];
        assert!(OrchestrationPlan::build(&set).unwrap_err().is_cycle());
    }

    #[test]
    fn test_configuration_errors() {
        let unknown = vec![universe("u1", 0, &[]), universe("u2", 1, &["ghost"])];
        assert!(matches!(
            OrchestrationPlan::build(&unknown),
            Err(DomainError::UnknownDependency { .. })
        ));

        let self_dep = vec![universe("u1", 0, &[]), universe("u2", 1, &["U2"])];
        assert!(matches!(
            OrchestrationPlan::build(&self_dep),
            Err(DomainError::SelfDependency(_))
        ));

        let dup_id = vec![universe("u1", 0, &[]), Universe::new("U1", 1, "guide")];
        assert!(matches!(
            OrchestrationPlan::build(&dup_id),
            Err(DomainError::DuplicateUniverseId(_))
        ));

        let dup_label = vec![
            Universe::new("u1", 0, "guide").with_label("same"),
            Universe::new("u2", 1, "guide").with_label("Same"),
        ];
        assert!(matches!(
            OrchestrationPlan::build(&dup_label),
            Err(DomainError::DuplicateUniverseLabel(_))
        ));

        let missing = vec![universe("u1", 0, &[]), Universe::new("  ", 1, "guide")];
        assert_eq!(
            OrchestrationPlan::build(&missing).unwrap_err(),
            DomainError::MissingUniverseId(1)
        );
    }

    #[test]
    fn test_label_equal_to_own_id_is_allowed() {
        let set = vec![universe("u1", 0, &[]), universe("u2", 1, &["u1"])];
        assert!(OrchestrationPlan::build(&set).is_ok());
    }

    #[test]
    fn test_rebuild_on_normalized_list_keeps_channel_ids() {
        let set = vec![
            universe("u1", 0, &[]).with_output_kind("Plan.Task"),
            universe("u2", 1, &["u1"]),
            universe("u3", 2, &["u1", "u2"]),
        ];
        let first = OrchestrationPlan::build(&set).unwrap();
        let second = OrchestrationPlan::build(first.universes()).unwrap();

        let ids = |p: &OrchestrationPlan| p.handoffs.iter().map(|h| h.channel.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(first.universes(), second.universes());
        assert_eq!(ids(&first)[0], "u1.result->u2.context#plan/task");
    }

    #[test]
    fn test_empty_plan() {
        let plan = OrchestrationPlan::build(&[]).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.scheduler, SchedulerMode::Parallel);
    }
}
