use crate::{build_menu, route_inbound, CoordinatorState, Effect, Msg, Route, Trigger};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: CoordinatorState, msg: Msg) -> (CoordinatorState, Vec<Effect>) {
    let effects = match msg {
        Msg::Startup => {
            // Registration is process-wide; a repeated startup must not duplicate menus.
            if state.menus_installed() {
                Vec::new()
            } else {
                state.mark_menus_installed();
                vec![Effect::InstallMenus(build_menu(state.registry()))]
            }
        }
        Msg::ToolbarClicked { tab_id } => vec![Effect::LoadAndParse(Trigger::toolbar(tab_id))],
        Msg::MenuClicked {
            tab_id,
            menu_item_id,
        } => Trigger::from_menu_item(tab_id, &menu_item_id)
            .map(Effect::LoadAndParse)
            .into_iter()
            .collect(),
        Msg::ContentMessage { message, sender } => match route_inbound(&message, &sender) {
            Route::Broadcast { tab_id, task } => vec![Effect::BroadcastTask { tab_id, task }],
            Route::Ignored(_) => Vec::new(),
        },
    };

    (state, effects)
}
