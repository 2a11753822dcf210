use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};
use thiserror::Error;

pub type TabId = u64;

/// Purpose tag of a message exchanged with a content agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Background to agent: extract the page, optionally with a named parser.
    Parse,
    /// Agent to background: an extracted task ready for broadcast.
    SendTask,
    /// Background to agent: broadcast attempts for the task have concluded.
    TaskSent,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Parse => "Parse",
            Action::SendTask => "SendTask",
            Action::TaskSent => "TaskSent",
        }
    }

    fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "Parse" => Some(Action::Parse),
            "SendTask" => Some(Action::SendTask),
            "TaskSent" => Some(Action::TaskSent),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single-hop message between the background coordinator and a tab's content agent.
///
/// On the wire this is `{ "action": <Action>, "payload"?: object }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// `None` asks the agent to auto-detect a parser.
    Parse { parser_name: Option<String> },
    /// `message` is a serialized task, opaque to the relay.
    SendTask { message: String },
    TaskSent,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("malformed envelope: {0}")]
    Malformed(String),
    #[error("unknown action {0:?}")]
    UnknownAction(String),
    #[error("{0} message is missing its payload")]
    MissingPayload(Action),
    #[error("invalid {action} payload: {reason}")]
    InvalidPayload { action: Action, reason: String },
}

#[derive(Debug, Deserialize)]
struct Envelope {
    action: String,
    #[serde(default)]
    payload: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParsePayload {
    #[serde(default)]
    parser_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SendTaskPayload {
    message: String,
}

impl Message {
    pub fn action(&self) -> Action {
        match self {
            Message::Parse { .. } => Action::Parse,
            Message::SendTask { .. } => Action::SendTask,
            Message::TaskSent => Action::TaskSent,
        }
    }

    /// Decodes a raw JSON envelope as raised by a content agent.
    pub fn decode(raw: &Value) -> Result<Self, ProtocolError> {
        let envelope = Envelope::deserialize(raw)
            .map_err(|err| ProtocolError::Malformed(err.to_string()))?;
        let action = Action::from_wire(&envelope.action)
            .ok_or_else(|| ProtocolError::UnknownAction(envelope.action.clone()))?;

        match action {
            Action::Parse => {
                // A bare Parse means auto-detect.
                let parser_name = match envelope.payload {
                    None | Some(Value::Null) => None,
                    Some(payload) => decode_payload::<ParsePayload>(action, payload)?.parser_name,
                };
                Ok(Message::Parse { parser_name })
            }
            Action::SendTask => {
                let payload = envelope
                    .payload
                    .filter(|payload| !payload.is_null())
                    .ok_or(ProtocolError::MissingPayload(action))?;
                let payload = decode_payload::<SendTaskPayload>(action, payload)?;
                Ok(Message::SendTask {
                    message: payload.message,
                })
            }
            Action::TaskSent => Ok(Message::TaskSent),
        }
    }

    /// Encodes the message in its wire shape.
    pub fn to_value(&self) -> Value {
        match self {
            Message::Parse { parser_name } => json!({
                "action": Action::Parse.as_str(),
                "payload": { "parserName": parser_name },
            }),
            Message::SendTask { message } => json!({
                "action": Action::SendTask.as_str(),
                "payload": { "message": message },
            }),
            Message::TaskSent => json!({ "action": Action::TaskSent.as_str() }),
        }
    }
}

fn decode_payload<T: serde::de::DeserializeOwned>(
    action: Action,
    payload: Value,
) -> Result<T, ProtocolError> {
    serde_json::from_value(payload).map_err(|err| ProtocolError::InvalidPayload {
        action,
        reason: err.to_string(),
    })
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Where an inbound message was raised.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SenderContext {
    #[serde(default)]
    pub tab: Option<TabInfo>,
}

impl SenderContext {
    pub fn from_tab(id: TabId) -> Self {
        Self {
            tab: Some(TabInfo { id, url: None }),
        }
    }

    /// A sender outside any tab, e.g. an extension page.
    pub fn detached() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: TabId,
    #[serde(default)]
    pub url: Option<String>,
}
