use serde_json::Value;

use crate::{Action, Message, ProtocolError, SenderContext, TabId};

/// Decision for one message raised by a content agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Broadcast { tab_id: TabId, task: String },
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Raised outside a tab's content agent.
    NoTab,
    Undecodable(ProtocolError),
    /// Recognized, but nothing handles it on the background side.
    Unhandled(Action),
}

/// Validates the sender and routes recognized actions. Never fails.
pub fn route_inbound(raw: &Value, sender: &SenderContext) -> Route {
    let Some(tab) = sender.tab.as_ref() else {
        return Route::Ignored(IgnoreReason::NoTab);
    };

    match Message::decode(raw) {
        Ok(Message::SendTask { message }) => Route::Broadcast {
            tab_id: tab.id,
            task: message,
        },
        Ok(other) => Route::Ignored(IgnoreReason::Unhandled(other.action())),
        Err(err) => Route::Ignored(IgnoreReason::Undecodable(err)),
    }
}
