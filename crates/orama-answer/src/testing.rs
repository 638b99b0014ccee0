//! Scripted transport for exercising sessions without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use futures_util::stream;
use tokio::sync::oneshot;

use crate::transport::{FragmentStream, Transport, TransportError, TransportRequest};

pub(crate) enum Step {
    Fragment(String),
    Fail(TransportError),
    /// Hold the stream until the sender fires or is dropped.
    Wait(oneshot::Receiver<()>),
    /// Never yield again.
    Hang,
}

/// One streamed response.
#[derive(Default)]
pub(crate) struct Script {
    connect_error: Option<TransportError>,
    steps: Vec<Step>,
}

impl Script {
    pub(crate) fn fragments(fragments: &[&str]) -> Self {
        Self {
            connect_error: None,
            steps: fragments
                .iter()
                .map(|f| Step::Fragment(f.to_string()))
                .collect(),
        }
    }

    /// The request itself fails; no stream is produced.
    pub(crate) fn refused(err: TransportError) -> Self {
        Self {
            connect_error: Some(err),
            steps: Vec::new(),
        }
    }

    pub(crate) fn then(mut self, fragment: &str) -> Self {
        self.steps.push(Step::Fragment(fragment.to_string()));
        self
    }

    pub(crate) fn then_fail(mut self, err: TransportError) -> Self {
        self.steps.push(Step::Fail(err));
        self
    }

    pub(crate) fn then_wait(mut self, gate: oneshot::Receiver<()>) -> Self {
        self.steps.push(Step::Wait(gate));
        self
    }

    pub(crate) fn then_hang(mut self) -> Self {
        self.steps.push(Step::Hang);
        self
    }

    fn into_stream(self) -> FragmentStream {
        Box::pin(stream::unfold(
            VecDeque::from(self.steps),
            |mut steps| async move {
                loop {
                    match steps.pop_front() {
                        None => return None,
                        Some(Step::Fragment(f)) => return Some((Ok(f), steps)),
                        Some(Step::Fail(err)) => {
                            steps.clear();
                            return Some((Err(err), steps));
                        }
                        Some(Step::Wait(gate)) => {
                            let _ = gate.await;
                        }
                        Some(Step::Hang) => std::future::pending::<()>().await,
                    }
                }
            },
        ))
    }
}

/// Serves queued scripts by endpoint and records every request.
///
/// Answer and generation calls pop the next script for their endpoint;
/// search calls pop the next JSON response.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    answers: Mutex<VecDeque<Script>>,
    generations: Mutex<VecDeque<Script>>,
    searches: Mutex<VecDeque<Result<serde_json::Value, TransportError>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_answer(self, script: Script) -> Self {
        self.answers.lock().unwrap().push_back(script);
        self
    }

    pub(crate) fn with_generation(self, script: Script) -> Self {
        self.generations.lock().unwrap().push_back(script);
        self
    }

    pub(crate) fn with_search(self, response: Result<serde_json::Value, TransportError>) -> Self {
        self.searches.lock().unwrap().push_back(response);
        self
    }

    pub(crate) fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Bodies of the requests whose path ends with `suffix`.
    pub(crate) fn bodies(&self, suffix: &str) -> Vec<serde_json::Value> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.ends_with(suffix))
            .filter_map(|r| r.body)
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(
        &self,
        request: TransportRequest,
    ) -> Result<serde_json::Value, TransportError> {
        let is_search = request.path.ends_with("/search");
        self.requests.lock().unwrap().push(request);
        if !is_search {
            return Err(TransportError::Network("unscripted request".into()));
        }
        self.searches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted search".into())))
    }

    async fn stream(&self, request: TransportRequest) -> Result<FragmentStream, TransportError> {
        let queue = if request.path.ends_with("/answer") {
            &self.answers
        } else if request.path.ends_with("/generate") {
            &self.generations
        } else {
            return Err(TransportError::Network("unscripted stream".into()));
        };
        self.requests.lock().unwrap().push(request);
        let script = queue
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::Network("no scripted stream".into()))?;
        match script.connect_error {
            Some(err) => Err(err),
            None => Ok(script.into_stream()),
        }
    }
}
