//! One question/answer exchange and its evolving state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::plan::PlanExecution;

/// Lifecycle of an interaction. Transitions only move forward:
/// `Pending -> Streaming -> Done | Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionState {
    Pending,
    Streaming,
    Done,
    Error,
}

impl InteractionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, InteractionState::Done | InteractionState::Error)
    }
}

/// A retrieved reference document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub document: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub query: String,
    pub response: String,
    pub sources: Option<Vec<Source>>,
    pub related_queries: Option<Vec<String>>,
    pub state: InteractionState,
    pub plan: Option<PlanExecution>,
    pub aborted: bool,
    /// Why the interaction ended in `Error`.
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Interaction {
    pub fn new(id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            query: query.into(),
            response: String::new(),
            sources: None,
            related_queries: None,
            state: InteractionState::Pending,
            plan: None,
            aborted: false,
            error: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Move to `next` if that is a forward transition out of a
    /// non-terminal state. Returns whether the state changed.
    pub fn advance(&mut self, next: InteractionState) -> bool {
        if self.state.is_terminal() || next <= self.state {
            return false;
        }
        self.state = next;
        true
    }

    /// Append a response fragment. Terminal interactions are frozen.
    pub fn append_response(&mut self, fragment: &str) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.response.push_str(fragment);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_pending_and_empty() {
        let i = Interaction::new("id-1", "What is Orama?");
        assert_eq!(i.state, InteractionState::Pending);
        assert!(i.response.is_empty());
        assert!(i.sources.is_none());
        assert!(!i.aborted);
        assert!(!i.is_terminal());
    }

    #[test]
    fn transitions_only_move_forward() {
        let mut i = Interaction::new("id", "q");
        assert!(i.advance(InteractionState::Streaming));
        assert!(!i.advance(InteractionState::Pending));
        assert!(!i.advance(InteractionState::Streaming));
        assert!(i.advance(InteractionState::Done));
        assert!(!i.advance(InteractionState::Error));
        assert_eq!(i.state, InteractionState::Done);
    }

    #[test]
    fn pending_can_fail_directly() {
        let mut i = Interaction::new("id", "q");
        assert!(i.advance(InteractionState::Error));
        assert!(i.is_terminal());
    }

    #[test]
    fn response_frozen_after_terminal() {
        let mut i = Interaction::new("id", "q");
        i.advance(InteractionState::Streaming);
        assert!(i.append_response("partial"));
        i.advance(InteractionState::Done);
        assert!(!i.append_response(" more"));
        assert_eq!(i.response, "partial");
    }

    #[test]
    fn state_serializes_lowercase() {
        let json = serde_json::to_string(&InteractionState::Streaming).unwrap();
        assert_eq!(json, "\"streaming\"");
    }
}
