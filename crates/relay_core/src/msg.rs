use serde_json::Value;

use crate::{SenderContext, TabId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Process start; installs the parser menu once.
    Startup,
    /// User clicked the toolbar button in a tab.
    ToolbarClicked { tab_id: TabId },
    /// User picked a context-menu entry.
    MenuClicked { tab_id: TabId, menu_item_id: String },
    /// A content agent raised a message. Kept raw until routed.
    ContentMessage { message: Value, sender: SenderContext },
}
