use crate::TabId;

/// Prefix of every menu entry that selects a specific parser.
pub const MENU_ITEM_PREFIX: &str = "parse-with-";

/// A request to parse the page in `tab_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub tab_id: TabId,
    /// `None` lets the content agent auto-detect.
    pub parser_name: Option<String>,
}

impl Trigger {
    /// Toolbar activation always auto-detects.
    pub fn toolbar(tab_id: TabId) -> Self {
        Self {
            tab_id,
            parser_name: None,
        }
    }

    /// Maps a context-menu click; clicks on entries that do not name a parser yield `None`.
    pub fn from_menu_item(tab_id: TabId, menu_item_id: &str) -> Option<Self> {
        parser_from_menu_item(menu_item_id).map(|name| Self {
            tab_id,
            parser_name: Some(name.to_string()),
        })
    }
}

/// Recovers the parser name from a `parse-with-<name>` menu identifier.
///
/// Only the leading prefix is stripped and an empty name is not a parser, so
/// `parse-with-` alone dispatches nothing rather than an empty parser name.
pub fn parser_from_menu_item(menu_item_id: &str) -> Option<&str> {
    menu_item_id
        .strip_prefix(MENU_ITEM_PREFIX)
        .filter(|name| !name.is_empty())
}
