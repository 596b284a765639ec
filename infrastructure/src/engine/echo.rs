//! Deterministic echo engine.
//!
//! A spec like `planner>coder+tester>reviewer` is read as stages separated
//! by `>`, each holding `+`-separated agents. Every agent answers with an
//! echo line naming itself, its stage, and the (clipped) input it saw. The
//! first stage sees the run input; later stages see the previous stage's
//! outputs joined by newlines.

use async_trait::async_trait;
use multiverse_application::{EngineError, EnginePlan, ExecutionEngine};
use multiverse_domain::{
    AgentRunResult, ECHO_OUTPUT_MARKER, ExecutionPlan, ExecutionReport, PlanStage, PlannedTask,
    clip_line,
};
use std::time::Duration;
use tracing::debug;

/// Input budget for the `input="..."` part of an echo line
pub const DEFAULT_ECHO_INPUT_CHARS: usize = 160;

/// Split a spec into stages of agent names.
pub fn parse_spec_stages(spec: &str) -> Result<Vec<PlanStage>, EngineError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(EngineError::InvalidSpec("spec is empty".to_string()));
    }

    spec.split('>')
        .enumerate()
        .map(|(index, stage)| {
            let agents = stage
                .split('+')
                .map(|agent| {
                    let agent = agent.trim();
                    if agent.is_empty() {
                        Err(EngineError::InvalidSpec(format!(
                            "empty agent name in stage {} of {:?}",
                            index, spec
                        )))
                    } else {
                        Ok(agent.to_string())
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(PlanStage { index, agents })
        })
        .collect()
}

/// Offline engine that echoes its input through each agent
#[derive(Debug, Clone)]
pub struct EchoEngine {
    input_max_chars: usize,
    delay: Option<Duration>,
}

impl Default for EchoEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EchoEngine {
    pub fn new() -> Self {
        Self {
            input_max_chars: DEFAULT_ECHO_INPUT_CHARS,
            delay: None,
        }
    }

    pub fn with_input_max_chars(mut self, max: usize) -> Self {
        self.input_max_chars = max;
        self
    }

    /// Sleep this long before each agent answers
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn echo(&self, agent: &str, stage: usize, input: &str) -> String {
        format!(
            "{} agent={} | stage={} | input=\"{}\"",
            ECHO_OUTPUT_MARKER,
            agent,
            stage,
            clip_line(input, self.input_max_chars)
        )
    }
}

#[async_trait]
impl ExecutionEngine for EchoEngine {
    async fn plan(&self, spec: &str, input: &str) -> Result<EnginePlan, EngineError> {
        let stages = parse_spec_stages(spec)?;
        let tasks = stages
            .iter()
            .flat_map(|stage| {
                stage.agents.iter().map(|agent| PlannedTask {
                    agent: agent.clone(),
                    stage_index: stage.index,
                })
            })
            .collect();

        Ok(EnginePlan {
            plan: ExecutionPlan {
                spec: spec.trim().to_string(),
                input: input.to_string(),
                parallel: stages.iter().any(|s| s.agents.len() > 1),
                stages,
            },
            tasks,
        })
    }

    async fn run(&self, spec: &str, input: &str) -> Result<ExecutionReport, EngineError> {
        let stages = parse_spec_stages(spec)?;
        let started_at = chrono::Utc::now();

        let mut results = Vec::new();
        let mut stage_input = input.to_string();
        for stage in &stages {
            let mut outputs = Vec::with_capacity(stage.agents.len());
            for agent in &stage.agents {
                if let Some(delay) = self.delay {
                    tokio::time::sleep(delay).await;
                }
                let output = self.echo(agent, stage.index, &stage_input);
                debug!("Echo agent {} answered at stage {}", agent, stage.index);
                outputs.push(output.clone());
                results.push(AgentRunResult::success(agent.as_str(), stage.index, output));
            }
            stage_input = outputs.join("\n");
        }

        let mut report = ExecutionReport::new(input, results);
        report.started_at = started_at;
        report.parallel = stages.iter().any(|s| s.agents.len() > 1);
        Ok(report)
    }
}
