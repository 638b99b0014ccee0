//! Answer sessions.
//!
//! An `AnswerSession` accepts asks, runs them one at a time in submission
//! order, and keeps the resulting interactions in an append-only store.
//! Each turn runs as a task on the runtime the session was built in; the
//! caller observes it through the `AskStream` returned by `ask`, through
//! `subscribe`, or through a callback registered on the builder.

mod ask;
mod backend;
mod config;
mod manager;
mod notify;
mod turn;


pub use ask::AskStream;
pub use config::{LlmConfig, SessionConfig, SessionIdentity};
pub use manager::{AnswerSession, SessionBuilder, StateCallback};
pub use notify::{Snapshot, Subscription};
