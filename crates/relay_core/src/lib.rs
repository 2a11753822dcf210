//! Relay core: protocol types, parser menu model and the pure routing state machine.
mod dispatch;
mod effect;
mod menu;
mod msg;
mod protocol;
mod router;
mod state;
mod update;

pub use dispatch::{parser_from_menu_item, Trigger, MENU_ITEM_PREFIX};
pub use effect::Effect;
pub use menu::{
    build_menu, MenuContext, MenuEntry, ParserCategory, ParserDescriptor, ParserRegistry,
    RegistryError, CONTEST_GROUP_ID, PROBLEM_GROUP_ID, ROOT_MENU_ID,
};
pub use msg::Msg;
pub use protocol::{Action, Message, ProtocolError, SenderContext, TabId, TabInfo};
pub use router::{route_inbound, IgnoreReason, Route};
pub use state::CoordinatorState;
pub use update::update;
