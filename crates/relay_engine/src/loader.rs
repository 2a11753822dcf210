use std::sync::Arc;

use relay_core::TabId;
use relay_logging::relay_debug;

use crate::{LoadOutcome, ScriptInjector};

pub const DEFAULT_CONTENT_SCRIPT: &str = "js/content.js";

/// Best-effort injection of the content agent.
///
/// Injection failures are expected (the agent is usually already present) and are
/// never surfaced; the caller only learns whether it may address the tab.
pub struct ScriptLoader {
    injector: Arc<dyn ScriptInjector>,
    script: String,
}

impl ScriptLoader {
    pub fn new(injector: Arc<dyn ScriptInjector>, script: impl Into<String>) -> Self {
        Self {
            injector,
            script: script.into(),
        }
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub async fn ensure_loaded(&self, tab_id: TabId) -> LoadOutcome {
        match self.injector.execute_script(tab_id, &self.script).await {
            Ok(()) => LoadOutcome::Ready,
            Err(err) => {
                relay_debug!("Skipping tab {}: content agent not injected: {}", tab_id, err);
                LoadOutcome::Unavailable
            }
        }
    }
}
