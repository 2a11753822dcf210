use relay_core::{MenuEntry, Message, TabId};

use crate::BrowserError;

/// Injects the content agent into a tab.
#[async_trait::async_trait]
pub trait ScriptInjector: Send + Sync {
    /// Fails when the tab is ineligible or the agent is already present.
    async fn execute_script(&self, tab_id: TabId, script: &str) -> Result<(), BrowserError>;
}

/// Background-to-agent half of the message bus.
#[async_trait::async_trait]
pub trait ContentBus: Send + Sync {
    async fn send(&self, tab_id: TabId, message: Message) -> Result<(), BrowserError>;
}

pub trait MenuSurface: Send + Sync {
    fn create_menu(&self, entry: &MenuEntry) -> Result<(), BrowserError>;
}
