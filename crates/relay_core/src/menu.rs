use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dispatch::MENU_ITEM_PREFIX;

pub const ROOT_MENU_ID: &str = "parse-with";
pub const PROBLEM_GROUP_ID: &str = "problem-parser";
pub const CONTEST_GROUP_ID: &str = "contest-parser";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParserCategory {
    Problem,
    Contest,
}

impl ParserCategory {
    /// Menu group that holds parsers of this category.
    pub fn group_id(self) -> &'static str {
        match self {
            ParserCategory::Problem => PROBLEM_GROUP_ID,
            ParserCategory::Contest => CONTEST_GROUP_ID,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserDescriptor {
    pub name: String,
    pub category: ParserCategory,
}

impl ParserDescriptor {
    pub fn new(name: impl Into<String>, category: ParserCategory) -> Self {
        Self {
            name: name.into(),
            category,
        }
    }

    pub fn is_contest(&self) -> bool {
        self.category == ParserCategory::Contest
    }

    /// Identifier of the menu entry that dispatches to this parser.
    pub fn menu_item_id(&self) -> String {
        format!("{MENU_ITEM_PREFIX}{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("parser name must not be empty")]
    EmptyName,
    #[error("parser {0:?} is already registered")]
    DuplicateName(String),
}

/// Known parsers in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParserRegistry {
    parsers: Vec<ParserDescriptor>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        category: ParserCategory,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.get(&name).is_some() {
            return Err(RegistryError::DuplicateName(name));
        }
        self.parsers.push(ParserDescriptor::new(name, category));
        Ok(())
    }

    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = ParserDescriptor>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor.name, descriptor.category)?;
        }
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&ParserDescriptor> {
        self.parsers.iter().find(|parser| parser.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParserDescriptor> {
        self.parsers.iter()
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

/// Browser surface a menu entry is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuContext {
    BrowserAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub id: String,
    pub parent_id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<MenuContext>,
}

impl MenuEntry {
    fn child(id: impl Into<String>, parent_id: &str, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: Some(parent_id.to_string()),
            title: title.into(),
            contexts: Vec::new(),
        }
    }
}

/// Builds the "Parse with" menu: root, the two category groups, then one leaf per parser.
///
/// Entries are ordered so every parent precedes its children.
pub fn build_menu(registry: &ParserRegistry) -> Vec<MenuEntry> {
    let mut entries = Vec::with_capacity(3 + registry.len());
    entries.push(MenuEntry {
        id: ROOT_MENU_ID.to_string(),
        parent_id: None,
        title: "Parse with".to_string(),
        contexts: vec![MenuContext::BrowserAction],
    });
    entries.push(MenuEntry::child(PROBLEM_GROUP_ID, ROOT_MENU_ID, "Problem parser"));
    entries.push(MenuEntry::child(CONTEST_GROUP_ID, ROOT_MENU_ID, "Contest parser"));

    entries.extend(registry.iter().map(|parser| {
        MenuEntry::child(
            parser.menu_item_id(),
            parser.category.group_id(),
            parser.name.clone(),
        )
    }));
    entries
}
