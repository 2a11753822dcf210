use crate::ParserRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoordinatorState {
    registry: ParserRegistry,
    menus_installed: bool,
}

impl CoordinatorState {
    pub fn new(registry: ParserRegistry) -> Self {
        Self {
            registry,
            menus_installed: false,
        }
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    pub fn menus_installed(&self) -> bool {
        self.menus_installed
    }

    pub(crate) fn mark_menus_installed(&mut self) {
        self.menus_installed = true;
    }
}
