//! Answer session: owns the interaction history and serializes asks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use orama_common::new_id;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::interaction::Interaction;
use crate::store::InteractionStore;
use crate::tools::{Tool, ToolRegistry};
use crate::transport::{HttpTransport, Transport};
use crate::{AnswerError, Message};

use super::ask::AskStream;
use super::config::{SessionConfig, SessionIdentity};
use super::notify::{Observers, Subscription};
use super::turn::{self, TurnOutcome};

/// Called with the full interaction history after every state change.
pub type StateCallback = Arc<dyn Fn(&[Interaction]) + Send + Sync>;

pub(super) struct ActiveTurn {
    pub(super) interaction_id: String,
    pub(super) cancel: CancellationToken,
}

pub(super) struct SessionState {
    pub(super) store: InteractionStore,
    /// Seed messages followed by completed exchanges.
    pub(super) messages: Vec<Message>,
    pub(super) active: Option<ActiveTurn>,
    /// Resolves when the most recently submitted turn has finished.
    pub(super) queue_tail: Option<oneshot::Receiver<()>>,
}

pub(super) struct Inner {
    pub(super) config: SessionConfig,
    pub(super) transport: Arc<dyn Transport>,
    pub(super) tools: ToolRegistry,
    pub(super) runtime: Handle,
    /// Cancelled when the session is dropped.
    pub(super) shutdown: CancellationToken,
    pub(super) state: Mutex<SessionState>,
    pub(super) observers: Arc<Observers>,
}

impl Inner {
    pub(super) fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish the current history. Call with the state lock held.
    pub(super) fn publish(&self, state: &SessionState) {
        self.observers.publish(Arc::new(state.store.snapshot()));
    }

    /// Cancel the active turn and leave its interaction terminal.
    pub(super) fn abort_locked(&self, state: &mut SessionState) -> bool {
        let Some(active) = state.active.take() else {
            return false;
        };
        active.cancel.cancel();
        turn::conclude(state, &active.interaction_id, TurnOutcome::Cancelled);
        info!(interaction = %active.interaction_id, "interaction aborted");
        true
    }
}

pub struct SessionBuilder {
    config: SessionConfig,
    transport: Option<Arc<dyn Transport>>,
    tools: ToolRegistry,
    callback: Option<StateCallback>,
}

impl SessionBuilder {
    /// Use `transport` instead of an `HttpTransport` built from the config.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn on_state_change(
        mut self,
        callback: impl Fn(&[Interaction]) + Send + Sync + 'static,
    ) -> Self {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Validate the configuration and start the session.
    ///
    /// Must be called from within a tokio runtime; turns run as tasks on
    /// it. Fails with `Configuration` before any I/O when the read
    /// credential is missing.
    pub fn build(self) -> Result<AnswerSession, AnswerError> {
        let read_api_key = self.config.validate()?;
        let runtime = Handle::try_current().map_err(|_| {
            AnswerError::Configuration("answer sessions require a tokio runtime".into())
        })?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let http = HttpTransport::new(self.config.transport_config(read_api_key))
                    .map_err(|e| AnswerError::Configuration(e.to_string()))?;
                Arc::new(http)
            }
        };

        let observers = Arc::new(Observers::default());
        if let Some(callback) = self.callback {
            let mut subscription = observers.subscribe();
            runtime.spawn(async move {
                while let Some(snapshot) = subscription.recv().await {
                    callback(snapshot.as_slice());
                }
            });
        }

        info!(
            collection = %self.config.collection_id,
            session = %self.config.identity.session_id,
            "answer session started"
        );

        let state = SessionState {
            store: InteractionStore::new(),
            messages: self.config.seed_messages.clone(),
            active: None,
            queue_tail: None,
        };

        Ok(AnswerSession {
            inner: Arc::new(Inner {
                config: self.config,
                transport,
                tools: self.tools,
                runtime,
                shutdown: CancellationToken::new(),
                state: Mutex::new(state),
                observers,
            }),
        })
    }
}

/// A conversation with a remote answer service.
///
/// Asks are processed one at a time in submission order. Progress is
/// observable through the `AskStream` returned by `ask`, through
/// `subscribe`, or through the callback given at construction. Dropping the
/// session cancels whatever is in flight.
pub struct AnswerSession {
    inner: Arc<Inner>,
}

impl AnswerSession {
    pub fn builder(config: SessionConfig) -> SessionBuilder {
        SessionBuilder {
            config,
            transport: None,
            tools: ToolRegistry::new(),
            callback: None,
        }
    }

    pub fn new(config: SessionConfig) -> Result<Self, AnswerError> {
        Self::builder(config).build()
    }

    /// Queue `query` and return a stream of its interaction's progress.
    ///
    /// Rejects blank queries with `InvalidState`. Transport and plan
    /// failures never surface here; they end the interaction in `error`.
    pub fn ask(&self, query: impl Into<String>) -> Result<AskStream, AnswerError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(AnswerError::InvalidState("query must not be empty".into()));
        }
        Ok(self.submit(query))
    }

    /// Ask the most recent query again as a new interaction.
    pub fn regenerate_last(&self) -> Result<AskStream, AnswerError> {
        let query = self
            .inner
            .lock()
            .store
            .last()
            .map(|i| i.query.clone())
            .ok_or_else(|| AnswerError::InvalidState("no interaction to regenerate".into()))?;
        debug!(%query, "regenerating last interaction");
        Ok(self.submit(query))
    }

    /// Cancel the active interaction, keeping its partial response.
    /// Does nothing when no interaction is in flight.
    pub fn abort(&self) {
        let mut state = self.inner.lock();
        if self.inner.abort_locked(&mut state) {
            self.inner.publish(&state);
        }
    }

    /// Abort, then clear the interaction history and conversation messages.
    pub fn reset(&self) {
        let mut state = self.inner.lock();
        if self.inner.abort_locked(&mut state) {
            self.inner.publish(&state);
        }
        state.store.reset();
        state.messages.clear();
        self.inner.publish(&state);
        info!("session reset");
    }

    pub fn interactions(&self) -> Vec<Interaction> {
        self.inner.lock().store.snapshot()
    }

    pub fn interaction(&self, id: &str) -> Option<Interaction> {
        self.inner.lock().store.get(id).cloned()
    }

    /// Conversation so far: seed messages plus every completed exchange.
    pub fn messages(&self) -> Vec<Message> {
        self.inner.lock().messages.clone()
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.inner.config.identity
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Whether an interaction is currently pending or streaming.
    pub fn is_busy(&self) -> bool {
        self.inner.lock().active.is_some()
    }

    pub fn subscribe(&self) -> Subscription {
        self.inner.observers.subscribe()
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.inner.observers.len()
    }

    fn submit(&self, query: String) -> AskStream {
        let interaction_id = new_id();
        let subscription = self.inner.observers.subscribe();
        let (done_tx, done_rx) = oneshot::channel::<()>();
        let previous = self.inner.lock().queue_tail.replace(done_rx);

        debug!(interaction = %interaction_id, queued = previous.is_some(), "ask submitted");

        let inner = Arc::clone(&self.inner);
        let id = interaction_id.clone();
        self.inner.runtime.spawn(async move {
            if let Some(previous) = previous {
                // Resolves on completion or when the previous task is gone.
                let _ = previous.await;
            }
            turn::run(&inner, id, query).await;
            drop(done_tx);
        });

        AskStream::new(interaction_id, subscription)
    }
}

impl Drop for AnswerSession {
    fn drop(&mut self) {
        self.inner.shutdown.cancel();
    }
}
