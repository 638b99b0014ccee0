//! One ask, from queue slot to terminal state.

use std::sync::Arc;

use futures_util::StreamExt;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::interaction::{Interaction, InteractionState, Source};
use crate::plan::{PlanExecution, PlanExecutor, PlanObserver};
use crate::protocol::{decode_fragment, AnswerEvent, Fragment};
use crate::transport::{TransportError, TransportRequest};
use crate::{AnswerError, Message};

use super::backend::SessionBackend;
use super::manager::{ActiveTurn, Inner, SessionState};

pub(super) enum TurnOutcome {
    Completed,
    Failed(AnswerError),
    Cancelled,
}

/// Run a queued ask. Every failure ends up in the interaction state.
pub(super) async fn run(inner: &Arc<Inner>, interaction_id: String, query: String) {
    if inner.shutdown.is_cancelled() {
        debug!(interaction = %interaction_id, "session closed, dropping queued ask");
        return;
    }
    let cancel = inner.shutdown.child_token();

    let prior = {
        let mut state = inner.lock();
        if let Err(e) = state
            .store
            .push(Interaction::new(&interaction_id, &query))
        {
            warn!(interaction = %interaction_id, error = %e, "could not start interaction");
            return;
        }
        state.active = Some(ActiveTurn {
            interaction_id: interaction_id.clone(),
            cancel: cancel.clone(),
        });
        inner.publish(&state);
        if let Some(interaction) = state.store.active_mut(&interaction_id) {
            interaction.advance(InteractionState::Streaming);
        }
        inner.publish(&state);
        inner.config.prior_messages(&state.messages)
    };

    info!(interaction = %interaction_id, "answering");

    let turn = Turn {
        inner,
        interaction_id: &interaction_id,
        query: &query,
        prior: &prior,
    };
    let outcome = tokio::select! {
        _ = cancel.cancelled() => TurnOutcome::Cancelled,
        result = turn.stream_answer() => match result {
            Ok(()) => TurnOutcome::Completed,
            Err(e) => TurnOutcome::Failed(e),
        },
    };

    let mut state = inner.lock();
    if state
        .active
        .as_ref()
        .is_some_and(|a| a.interaction_id == interaction_id)
    {
        state.active = None;
    }
    if conclude(&mut state, &interaction_id, outcome) {
        inner.publish(&state);
    }
}

/// Move interaction `id` to its terminal state and record the exchange in
/// the conversation. Returns false if it was already terminal.
pub(super) fn conclude(state: &mut SessionState, id: &str, outcome: TurnOutcome) -> bool {
    let SessionState {
        store, messages, ..
    } = state;
    let Some(interaction) = store.active_mut(id) else {
        return false;
    };

    match outcome {
        TurnOutcome::Completed => {
            interaction.advance(InteractionState::Done);
            info!(interaction = %id, chars = interaction.response.len(), "interaction done");
        }
        TurnOutcome::Failed(err) => {
            warn!(interaction = %id, error = %err, "interaction failed");
            interaction.error = Some(err.to_string());
            interaction.advance(InteractionState::Error);
        }
        TurnOutcome::Cancelled => {
            interaction.aborted = true;
            if let Some(plan) = interaction.plan.as_mut() {
                plan.skip_remaining();
            }
            interaction.advance(InteractionState::Done);
        }
    }

    if interaction.state == InteractionState::Done && !interaction.response.is_empty() {
        messages.push(Message::user(interaction.query.clone()));
        messages.push(Message::assistant(interaction.response.clone()));
    }
    true
}

pub(super) struct Turn<'a> {
    pub(super) inner: &'a Inner,
    pub(super) interaction_id: &'a str,
    pub(super) query: &'a str,
    pub(super) prior: &'a [Message],
}

impl Turn<'_> {
    /// Apply `f` to the interaction and publish, unless it is no longer
    /// active.
    pub(super) fn update(&self, f: impl FnOnce(&mut Interaction)) -> bool {
        let mut state = self.inner.lock();
        let Some(interaction) = state.store.active_mut(self.interaction_id) else {
            return false;
        };
        f(interaction);
        self.inner.publish(&state);
        true
    }

    fn answer_body(&self) -> serde_json::Value {
        let config = &self.inner.config;
        let mut body = json!({
            "interaction_id": self.interaction_id,
            "collection_id": config.collection_id,
            "query": self.query,
            "messages": self.prior,
            "visitor_id": config.identity.visitor_id,
            "session_id": config.identity.session_id.as_str(),
            "tools": self.inner.tools.definitions(),
        });
        if let Some(llm) = &config.llm {
            body["llm_config"] = json!(llm);
        }
        body
    }

    async fn stream_answer(&self) -> Result<(), AnswerError> {
        let request = TransportRequest::post(self.inner.config.answer_path(), self.answer_body());
        let mut fragments = self.inner.transport.stream(request).await?;
        let mut has_content = false;

        while let Some(item) = fragments.next().await {
            match decode_fragment(item?)? {
                Fragment::Text(delta) | Fragment::Event(AnswerEvent::Text { delta }) => {
                    has_content = true;
                    self.update(|i| {
                        i.append_response(&delta);
                    });
                }
                Fragment::Event(AnswerEvent::Sources { sources }) => {
                    has_content = true;
                    self.update(|i| i.sources = Some(sources));
                }
                Fragment::Event(AnswerEvent::RelatedQueries { queries }) => {
                    has_content = true;
                    self.update(|i| i.related_queries = Some(queries));
                }
                Fragment::Event(AnswerEvent::Plan { steps }) if !has_content => {
                    return self.run_plan(PlanExecution::from_descriptors(steps)).await;
                }
                Fragment::Event(AnswerEvent::Plan { .. }) => {
                    warn!(interaction = %self.interaction_id, "plan after answer content ignored");
                }
                Fragment::Event(AnswerEvent::Error { message }) => {
                    return Err(TransportError::Remote(message).into());
                }
                Fragment::Event(AnswerEvent::Done) => break,
                Fragment::Event(AnswerEvent::Acknowledged | AnswerEvent::Unknown) => {}
            }
        }
        Ok(())
    }

    async fn run_plan(&self, mut plan: PlanExecution) -> Result<(), AnswerError> {
        info!(interaction = %self.interaction_id, steps = plan.steps.len(), "running plan");
        let declared = plan.clone();
        self.update(|i| i.plan = Some(declared));

        let backend = SessionBackend::new(self.inner, self.interaction_id, self.prior);
        let mut observer = InteractionObserver { turn: self };
        // The observer has already appended every streamed fragment.
        let response = PlanExecutor::new(&backend, self.query)
            .run(&mut plan, &mut observer)
            .await?;
        debug!(interaction = %self.interaction_id, chars = response.len(), "plan finished");
        Ok(())
    }
}

/// Mirrors executor progress into the active interaction.
struct InteractionObserver<'a> {
    turn: &'a Turn<'a>,
}

impl PlanObserver for InteractionObserver<'_> {
    fn plan_changed(&mut self, plan: &PlanExecution) {
        let plan = plan.clone();
        self.turn.update(|i| i.plan = Some(plan));
    }

    fn sources_found(&mut self, sources: &[Source]) {
        let sources = sources.to_vec();
        self.turn
            .update(|i| i.sources.get_or_insert_with(Vec::new).extend(sources));
    }

    fn response_fragment(&mut self, fragment: &str) {
        self.turn.update(|i| {
            i.append_response(fragment);
        });
    }
}
