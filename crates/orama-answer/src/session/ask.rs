//! Per-ask view of session progress.

use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures_util::{Stream, StreamExt};

use crate::interaction::Interaction;
use crate::AnswerError;

use super::notify::Subscription;

/// Snapshots of a single interaction, from creation to its terminal state.
///
/// Returned by `AnswerSession::ask`. The stream ends after the terminal
/// snapshot, or early if the session is dropped or reset. The underlying
/// subscription is released as soon as the stream ends.
pub struct AskStream {
    interaction_id: String,
    subscription: Option<Subscription>,
    seen: bool,
}

impl AskStream {
    pub(crate) fn new(interaction_id: String, subscription: Subscription) -> Self {
        Self {
            interaction_id,
            subscription: Some(subscription),
            seen: false,
        }
    }

    pub fn interaction_id(&self) -> &str {
        &self.interaction_id
    }

    /// Wait for the interaction to reach `done` or `error`.
    ///
    /// Pipeline failures are reported through the returned interaction's
    /// state, not as an `Err`; this only fails if the session goes away
    /// first.
    pub async fn finish(mut self) -> Result<Interaction, AnswerError> {
        let mut last = None;
        while let Some(interaction) = self.next().await {
            last = Some(interaction);
        }
        match last {
            Some(interaction) if interaction.is_terminal() => Ok(interaction),
            _ => Err(AnswerError::InvalidState(format!(
                "session closed before interaction {} finished",
                self.interaction_id
            ))),
        }
    }
}

impl Stream for AskStream {
    type Item = Interaction;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Interaction>> {
        let this = self.get_mut();
        while let Some(subscription) = this.subscription.as_mut() {
            let Some(snapshot) = ready!(subscription.poll_next_unpin(cx)) else {
                this.subscription = None;
                break;
            };
            match snapshot.iter().find(|i| i.id == this.interaction_id) {
                Some(interaction) => {
                    this.seen = true;
                    if interaction.is_terminal() {
                        this.subscription = None;
                    }
                    return Poll::Ready(Some(interaction.clone()));
                }
                // Cleared by a reset.
                None if this.seen => this.subscription = None,
                None => {}
            }
        }
        Poll::Ready(None)
    }
}
