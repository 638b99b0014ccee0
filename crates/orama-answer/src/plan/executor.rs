//! Sequential plan execution.

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::Serialize;
use tracing::{debug, warn};

use crate::interaction::Source;
use crate::protocol::{decode_fragment, AnswerEvent, Fragment};
use crate::tools::parse_arguments;
use crate::transport::{FragmentStream, TransportError};
use crate::AnswerError;

use super::{PlanExecution, StepAction, StepStatus};

/// Output of a tool-call step, forwarded to generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolOutput {
    pub name: String,
    pub output: serde_json::Value,
}

/// Context handed to a generation step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub query: String,
    pub instructions: Option<String>,
    pub sources: Vec<Source>,
    pub tool_outputs: Vec<ToolOutput>,
}

/// Performs the side effects of individual steps.
#[async_trait]
pub trait StepBackend: Send + Sync {
    async fn retrieve(&self, query: &str, limit: Option<usize>) -> Result<Vec<Source>, AnswerError>;

    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, AnswerError>;

    async fn generate(&self, request: GenerationRequest) -> Result<FragmentStream, AnswerError>;
}

/// Receives executor progress as it happens.
pub trait PlanObserver: Send {
    /// A step changed status or the plan advanced.
    fn plan_changed(&mut self, plan: &PlanExecution);
    /// A retrieval step produced sources.
    fn sources_found(&mut self, sources: &[Source]);
    /// The final generation step produced a fragment of the answer.
    fn response_fragment(&mut self, fragment: &str);
}

#[derive(Default)]
struct StepContext {
    sources: Vec<Source>,
    tool_outputs: Vec<ToolOutput>,
    response: String,
}

pub struct PlanExecutor<'a> {
    backend: &'a dyn StepBackend,
    query: &'a str,
}

impl<'a> PlanExecutor<'a> {
    pub fn new(backend: &'a dyn StepBackend, query: &'a str) -> Self {
        Self { backend, query }
    }

    /// Drive every remaining step to a terminal status, in declared order.
    ///
    /// Returns the output of the last generation step. A failed optional
    /// step is recorded and skipped over; a failed required step stops the
    /// plan with `current_step_index` left on it.
    pub async fn run(
        &self,
        plan: &mut PlanExecution,
        observer: &mut dyn PlanObserver,
    ) -> Result<String, AnswerError> {
        let final_generation = plan.final_generation_index();
        let mut context = StepContext::default();

        while !plan.is_finished() {
            let index = plan.current_step_index;
            plan.steps[index].status = StepStatus::Running;
            observer.plan_changed(plan);
            debug!(step = index, kind = %plan.steps[index].kind(), "plan step started");

            let streams_response = final_generation == Some(index);
            let result = self
                .run_step(
                    &mut plan.steps[index].action,
                    &mut context,
                    streams_response,
                    observer,
                )
                .await;

            let step = &mut plan.steps[index];
            match result {
                Ok(()) => step.status = StepStatus::Done,
                Err(err) => {
                    let reason = err.to_string();
                    step.status = StepStatus::Failed;
                    step.error = Some(reason.clone());
                    if step.required {
                        let kind = step.kind();
                        warn!(step = index, %kind, error = %reason, "required plan step failed");
                        observer.plan_changed(plan);
                        return Err(AnswerError::PlanStep {
                            index,
                            kind,
                            reason,
                        });
                    }
                    warn!(step = index, error = %reason, "optional plan step failed, continuing");
                }
            }

            plan.current_step_index += 1;
            observer.plan_changed(plan);
        }

        Ok(context.response)
    }

    async fn run_step(
        &self,
        action: &mut StepAction,
        context: &mut StepContext,
        streams_response: bool,
        observer: &mut dyn PlanObserver,
    ) -> Result<(), AnswerError> {
        match action {
            StepAction::Retrieval {
                query,
                limit,
                sources,
            } => {
                let term = query.as_deref().unwrap_or(self.query);
                let found = self.backend.retrieve(term, *limit).await?;
                observer.sources_found(&found);
                context.sources.extend(found.iter().cloned());
                *sources = Some(found);
            }
            StepAction::ToolCall {
                name,
                arguments,
                output,
            } => {
                let parsed = parse_arguments(arguments)?;
                let value = self.backend.call_tool(name, parsed).await?;
                context.tool_outputs.push(ToolOutput {
                    name: name.clone(),
                    output: value.clone(),
                });
                *output = Some(value);
            }
            StepAction::Generation {
                instructions,
                output,
            } => {
                let request = GenerationRequest {
                    query: self.query.to_string(),
                    instructions: instructions.clone(),
                    sources: context.sources.clone(),
                    tool_outputs: context.tool_outputs.clone(),
                };
                let mut fragments = self.backend.generate(request).await?;
                let mut text = String::new();

                while let Some(item) = fragments.next().await {
                    let delta = match decode_fragment(item?)? {
                        Fragment::Text(t) | Fragment::Event(AnswerEvent::Text { delta: t }) => t,
                        Fragment::Event(AnswerEvent::Error { message }) => {
                            return Err(TransportError::Remote(message).into());
                        }
                        Fragment::Event(AnswerEvent::Done) => break,
                        Fragment::Event(_) => continue,
                    };
                    if streams_response {
                        observer.response_fragment(&delta);
                    }
                    text.push_str(&delta);
                }

                if streams_response {
                    context.response = text.clone();
                }
                *output = Some(text);
            }
        }
        Ok(())
    }
}
