//! Server-declared multi-step plans.
//!
//! The service may answer with a plan instead of text: an ordered list of
//! retrieval, tool-call and generation steps. The client runs them strictly
//! in declared order; each step records its status and a typed result.

mod executor;


pub use executor::{GenerationRequest, PlanExecutor, PlanObserver, StepBackend, ToolOutput};

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::interaction::Source;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Retrieval,
    ToolCall,
    Generation,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::Retrieval => write!(f, "retrieval"),
            StepKind::ToolCall => write!(f, "tool_call"),
            StepKind::Generation => write!(f, "generation"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Running,
    Done,
    Failed,
    Skipped,
}

impl StepStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            StepStatus::Done | StepStatus::Failed | StepStatus::Skipped
        )
    }
}

/// A step as declared on the wire, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepDescriptor {
    Retrieval {
        #[serde(default)]
        query: Option<String>,
        #[serde(default)]
        limit: Option<usize>,
        #[serde(default)]
        required: Option<bool>,
    },
    ToolCall {
        name: String,
        /// Serialized JSON arguments.
        #[serde(default, deserialize_with = "arguments_text")]
        arguments: String,
        #[serde(default)]
        required: Option<bool>,
    },
    Generation {
        #[serde(default)]
        instructions: Option<String>,
        #[serde(default)]
        required: Option<bool>,
    },
}

/// Arguments are declared as serialized text; tolerate services that
/// inline the JSON object by re-serializing it.
fn arguments_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// What a step does, with its typed result once resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepAction {
    Retrieval {
        query: Option<String>,
        limit: Option<usize>,
        sources: Option<Vec<Source>>,
    },
    ToolCall {
        name: String,
        arguments: String,
        output: Option<serde_json::Value>,
    },
    Generation {
        instructions: Option<String>,
        output: Option<String>,
    },
}

impl StepAction {
    pub fn kind(&self) -> StepKind {
        match self {
            StepAction::Retrieval { .. } => StepKind::Retrieval,
            StepAction::ToolCall { .. } => StepKind::ToolCall,
            StepAction::Generation { .. } => StepKind::Generation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub action: StepAction,
    pub status: StepStatus,
    /// A failed required step aborts the plan.
    pub required: bool,
    pub error: Option<String>,
}

impl PlanStep {
    pub fn kind(&self) -> StepKind {
        self.action.kind()
    }
}

impl From<StepDescriptor> for PlanStep {
    fn from(descriptor: StepDescriptor) -> Self {
        // Tool calls are optional unless flagged; retrieval and generation
        // are required unless flagged otherwise.
        let (action, required) = match descriptor {
            StepDescriptor::Retrieval {
                query,
                limit,
                required,
            } => (
                StepAction::Retrieval {
                    query,
                    limit,
                    sources: None,
                },
                required.unwrap_or(true),
            ),
            StepDescriptor::ToolCall {
                name,
                arguments,
                required,
            } => (
                StepAction::ToolCall {
                    name,
                    arguments,
                    output: None,
                },
                required.unwrap_or(false),
            ),
            StepDescriptor::Generation {
                instructions,
                required,
            } => (
                StepAction::Generation {
                    instructions,
                    output: None,
                },
                required.unwrap_or(true),
            ),
        };
        Self {
            action,
            status: StepStatus::Pending,
            required,
            error: None,
        }
    }
}

/// Progress through a declared plan.
///
/// Invariant: every step before `current_step_index` is terminal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanExecution {
    pub steps: Vec<PlanStep>,
    pub current_step_index: usize,
}

impl PlanExecution {
    pub fn from_descriptors(descriptors: Vec<StepDescriptor>) -> Self {
        Self {
            steps: descriptors.into_iter().map(PlanStep::from).collect(),
            current_step_index: 0,
        }
    }

    pub fn current(&self) -> Option<&PlanStep> {
        self.steps.get(self.current_step_index)
    }

    pub fn is_finished(&self) -> bool {
        self.current_step_index >= self.steps.len()
    }

    /// Index of the step whose output becomes the interaction response.
    pub fn final_generation_index(&self) -> Option<usize> {
        self.steps
            .iter()
            .rposition(|s| s.kind() == StepKind::Generation)
    }

    /// Mark every non-terminal step skipped. Used when the owning
    /// interaction is aborted.
    pub fn skip_remaining(&mut self) {
        for step in &mut self.steps {
            if !step.status.is_terminal() {
                step.status = StepStatus::Skipped;
            }
        }
    }
}
