use crate::{MenuEntry, TabId, Trigger};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    InstallMenus(Vec<MenuEntry>),
    /// Inject the content agent, then ask it to parse.
    LoadAndParse(Trigger),
    BroadcastTask { tab_id: TabId, task: String },
}
