use std::sync::Arc;

use relay_core::{Message, Trigger};
use relay_logging::{relay_debug, relay_trace};

use crate::{ContentBus, ScriptLoader};

/// Turns a user trigger into a `Parse` instruction for the tab's content agent.
pub struct Dispatcher {
    loader: ScriptLoader,
    bus: Arc<dyn ContentBus>,
}

impl Dispatcher {
    pub fn new(loader: ScriptLoader, bus: Arc<dyn ContentBus>) -> Self {
        Self { loader, bus }
    }

    pub async fn on_trigger(&self, trigger: Trigger) {
        let Trigger {
            tab_id,
            parser_name,
        } = trigger;

        if !self.loader.ensure_loaded(tab_id).await.is_ready() {
            return;
        }

        relay_trace!("Parse tab={} parser={:?}", tab_id, parser_name);
        if let Err(err) = self.bus.send(tab_id, Message::Parse { parser_name }).await {
            relay_debug!("Parse instruction to tab {} not delivered: {}", tab_id, err);
        }
    }
}
