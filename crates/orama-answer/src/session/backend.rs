//! Plan steps backed by the session's transport and tools.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::interaction::Source;
use crate::plan::{GenerationRequest, StepBackend};
use crate::transport::{FragmentStream, TransportError, TransportRequest};
use crate::{AnswerError, Message};

use super::manager::Inner;

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Source>,
}

pub(super) struct SessionBackend<'a> {
    inner: &'a Inner,
    interaction_id: &'a str,
    prior: &'a [Message],
}

impl<'a> SessionBackend<'a> {
    pub(super) fn new(inner: &'a Inner, interaction_id: &'a str, prior: &'a [Message]) -> Self {
        Self {
            inner,
            interaction_id,
            prior,
        }
    }
}

#[async_trait]
impl StepBackend for SessionBackend<'_> {
    async fn retrieve(&self, query: &str, limit: Option<usize>) -> Result<Vec<Source>, AnswerError> {
        let mut body = json!({ "term": query });
        if let Some(limit) = limit {
            body["limit"] = json!(limit);
        }
        let request = TransportRequest::post(self.inner.config.search_path(), body);
        let response = self.inner.transport.request(request).await?;
        let parsed: SearchResponse = serde_json::from_value(response)
            .map_err(|e| TransportError::Decode(format!("search response: {e}")))?;
        debug!(interaction = %self.interaction_id, hits = parsed.hits.len(), "retrieval finished");
        Ok(parsed.hits)
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, AnswerError> {
        debug!(interaction = %self.interaction_id, tool = %name, "calling tool");
        Ok(self.inner.tools.call(name, arguments).await?)
    }

    async fn generate(&self, request: GenerationRequest) -> Result<FragmentStream, AnswerError> {
        let config = &self.inner.config;
        let mut body = json!({
            "interaction_id": self.interaction_id,
            "query": request.query,
            "instructions": request.instructions,
            "context": {
                "sources": request.sources,
                "tool_outputs": request.tool_outputs,
            },
            "messages": self.prior,
            "visitor_id": config.identity.visitor_id,
            "session_id": config.identity.session_id.as_str(),
        });
        if let Some(llm) = &config.llm {
            body["llm_config"] = json!(llm);
        }
        let request = TransportRequest::post(config.generate_path(), body);
        Ok(self.inner.transport.stream(request).await?)
    }
}
