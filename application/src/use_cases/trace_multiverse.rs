//! Trace Multiverse use case
//!
//! Builds the orchestration plan and asks the engine what each universe
//! would execute, without running anything. No branch has produced output
//! yet, so every universe is planned against its own base input.

use crate::ports::execution_engine::ExecutionEngine;
use multiverse_domain::{DomainError, ExecutionPlan, OrchestrationPlan, PlannedTask, Universe};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Engine plan for one universe
#[derive(Debug, Clone, Serialize)]
pub struct TraceBranch {
    pub universe: Universe,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<ExecutionPlan>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<PlannedTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Plan plus per-universe engine plans
#[derive(Debug, Clone, Serialize)]
pub struct MultiverseTrace {
    pub plan: OrchestrationPlan,
    pub branches: Vec<TraceBranch>,
}

/// Use case for tracing a multiverse without executing it
pub struct TraceMultiverseUseCase<E: ExecutionEngine + 'static> {
    engine: Arc<E>,
}

impl<E: ExecutionEngine + 'static> TraceMultiverseUseCase<E> {
    pub fn new(engine: Arc<E>) -> Self {
        Self { engine }
    }

    pub async fn execute(&self, universes: &[Universe]) -> Result<MultiverseTrace, DomainError> {
        let plan = OrchestrationPlan::build(universes)?;

        let mut branches = Vec::with_capacity(plan.len());
        for universe in plan.universes() {
            let branch = match self.engine.plan(&universe.spec, universe.input.trim()).await {
                Ok(planned) => {
                    debug!(
                        "Universe {} plans {} task(s)",
                        universe.display_name(),
                        planned.tasks.len()
                    );
                    TraceBranch {
                        universe: universe.clone(),
                        plan: Some(planned.plan),
                        tasks: planned.tasks,
                        error: None,
                    }
                }
                Err(e) => {
                    warn!("Universe {} could not be planned: {}", universe.display_name(), e);
                    TraceBranch {
                        universe: universe.clone(),
                        plan: None,
                        tasks: Vec::new(),
                        error: Some(e.to_string()),
                    }
                }
            };
            branches.push(branch);
        }

        Ok(MultiverseTrace { plan, branches })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::execution_engine::{EngineError, EnginePlan};
    use async_trait::async_trait;
    use multiverse_domain::{ExecutionReport, PlanStage, SchedulerMode};
    use std::sync::Mutex;

    /// Plans every spec as a single stage of its `+`-separated agents
    struct PlanOnlyEngine {
        runs: Mutex<usize>,
    }

    #[async_trait]
    impl ExecutionEngine for PlanOnlyEngine {
        async fn plan(&self, spec: &str, input: &str) -> Result<EnginePlan, EngineError> {
            if spec == "broken" {
                return Err(EngineError::InvalidSpec("broken".to_string()));
            }
            let agents: Vec<String> = spec.split('+').map(str::to_string).collect();
            Ok(EnginePlan {
                tasks: agents
                    .iter()
                    .map(|a| PlannedTask { agent: a.clone(), stage_index: 0 })
                    .collect(),
                plan: ExecutionPlan {
                    spec: spec.to_string(),
                    input: input.to_string(),
                    parallel: true,
                    stages: vec![PlanStage { index: 0, agents }],
                },
            })
        }

        async fn run(&self, _spec: &str, _input: &str) -> Result<ExecutionReport, EngineError> {
            *self.runs.lock().unwrap() += 1;
            Err(EngineError::Other("trace must not run".to_string()))
        }
    }

    #[tokio::test]
    async fn test_trace_plans_without_running() {
        let engine = Arc::new(PlanOnlyEngine { runs: Mutex::new(0) });
        let universes = vec![
            Universe::new("u1", 0, "a+b").with_input("task"),
            Universe::new("u2", 1, "broken"),
            Universe::new("u3", 2, "c").with_depends_on(["u1"]),
        ];

        let trace = TraceMultiverseUseCase::new(engine.clone())
            .execute(&universes)
            .await
            .unwrap();

        assert_eq!(trace.plan.scheduler, SchedulerMode::Dag);
        assert_eq!(trace.branches.len(), 3);
        assert_eq!(trace.branches[0].tasks.len(), 2);
        assert_eq!(trace.branches[0].plan.as_ref().unwrap().input, "task");
        assert!(trace.branches[1].error.as_deref().unwrap().contains("broken"));
        assert!(trace.branches[2].plan.is_some());
        assert_eq!(*engine.runs.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_trace_rejects_invalid_graph() {
        let engine = Arc::new(PlanOnlyEngine { runs: Mutex::new(0) });
        let universes = vec![Universe::new("u1", 0, "a").with_depends_on(["ghost"])];
        let err = TraceMultiverseUseCase::new(engine)
            .execute(&universes)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UnknownDependency { .. }));
    }
}
