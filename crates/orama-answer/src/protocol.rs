//! Decoding of answer-stream fragments.
//!
//! A fragment is either a typed JSON event (an object with a string `type`
//! field) or plain answer text. Unknown event types are tolerated so newer
//! services do not break older clients; a known type with malformed fields
//! is a protocol error.

use serde::Deserialize;

use crate::interaction::Source;
use crate::plan::StepDescriptor;
use crate::AnswerError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnswerEvent {
    Acknowledged,
    Text {
        delta: String,
    },
    Sources {
        sources: Vec<Source>,
    },
    RelatedQueries {
        queries: Vec<String>,
    },
    /// The service wants the client to drive a multi-step plan.
    Plan {
        steps: Vec<StepDescriptor>,
    },
    Error {
        message: String,
    },
    Done,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Text(String),
    Event(AnswerEvent),
}

pub fn decode_fragment(raw: String) -> Result<Fragment, AnswerError> {
    let value = match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(value @ serde_json::Value::Object(_)) if value["type"].is_string() => value,
        _ => return Ok(Fragment::Text(raw)),
    };
    serde_json::from_value(value)
        .map(Fragment::Event)
        .map_err(|e| AnswerError::Protocol(format!("malformed event: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: &str) -> Fragment {
        decode_fragment(raw.to_string()).unwrap()
    }

    #[test]
    fn plain_text_is_a_text_fragment() {
        assert_eq!(decode("Orama "), Fragment::Text("Orama ".into()));
    }

    #[test]
    fn non_object_json_is_text() {
        assert_eq!(decode("42"), Fragment::Text("42".into()));
        assert_eq!(decode("\"quoted\""), Fragment::Text("\"quoted\"".into()));
        assert_eq!(
            decode(r#"{"delta":"no type"}"#),
            Fragment::Text(r#"{"delta":"no type"}"#.into())
        );
    }

    #[test]
    fn text_event() {
        assert_eq!(
            decode(r#"{"type":"text","delta":"is a "}"#),
            Fragment::Event(AnswerEvent::Text {
                delta: "is a ".into()
            })
        );
    }

    #[test]
    fn sources_event() {
        let fragment = decode(
            r#"{"type":"sources","sources":[{"id":"doc-1","score":0.9,"document":{"title":"Intro"}}]}"#,
        );
        let Fragment::Event(AnswerEvent::Sources { sources }) = fragment else {
            panic!("expected sources event");
        };
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].id, "doc-1");
        assert_eq!(sources[0].score, Some(0.9));
    }

    #[test]
    fn plan_event_with_inline_arguments() {
        let fragment = decode(
            r#"{"type":"plan","steps":[
                {"kind":"retrieval"},
                {"kind":"tool_call","name":"weather","arguments":{"city":"Rome"}},
                {"kind":"generation","required":false}
            ]}"#,
        );
        let Fragment::Event(AnswerEvent::Plan { steps }) = fragment else {
            panic!("expected plan event");
        };
        assert_eq!(steps.len(), 3);
        assert_eq!(
            steps[1],
            StepDescriptor::ToolCall {
                name: "weather".into(),
                arguments: r#"{"city":"Rome"}"#.into(),
                required: None,
            }
        );
    }

    #[test]
    fn unknown_event_type_is_tolerated() {
        assert_eq!(
            decode(r#"{"type":"telemetry","latency_ms":12}"#),
            Fragment::Event(AnswerEvent::Unknown)
        );
    }

    #[test]
    fn malformed_known_event_is_a_protocol_error() {
        let err = decode_fragment(r#"{"type":"text"}"#.to_string()).unwrap_err();
        assert!(matches!(err, AnswerError::Protocol(_)));
    }

    #[test]
    fn unknown_step_kind_is_a_protocol_error() {
        let err = decode_fragment(r#"{"type":"plan","steps":[{"kind":"teleport"}]}"#.to_string())
            .unwrap_err();
        assert!(matches!(err, AnswerError::Protocol(_)));
    }
}
