use std::mem;
use std::sync::Arc;

use relay_core::{update, CoordinatorState, Effect, Msg, ParserRegistry};
use relay_logging::{relay_debug, relay_warn};
use tokio::task::JoinSet;

use crate::{
    Broadcaster, ContentBus, DeliveryMode, Dispatcher, HostProvider, MenuSurface, ScriptInjector,
    ScriptLoader, DEFAULT_CONTENT_SCRIPT,
};

/// Browser and host capabilities the coordinator drives.
#[derive(Clone)]
pub struct Services {
    pub hosts: Arc<dyn HostProvider>,
    pub injector: Arc<dyn ScriptInjector>,
    pub bus: Arc<dyn ContentBus>,
    pub menus: Arc<dyn MenuSurface>,
}

#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    pub content_script: String,
    pub delivery: DeliveryMode,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            content_script: DEFAULT_CONTENT_SCRIPT.to_string(),
            delivery: DeliveryMode::default(),
        }
    }
}

/// Background hub: feeds messages through the pure update and runs the resulting effects.
///
/// Async effects are fire-and-forget tasks on the current tokio runtime; `handle`
/// must be called from within one.
pub struct Coordinator {
    state: CoordinatorState,
    dispatcher: Arc<Dispatcher>,
    broadcaster: Arc<Broadcaster>,
    menus: Arc<dyn MenuSurface>,
    in_flight: JoinSet<()>,
}

impl Coordinator {
    pub fn new(registry: ParserRegistry, services: Services, settings: CoordinatorSettings) -> Self {
        let loader = ScriptLoader::new(services.injector, settings.content_script);
        let dispatcher = Dispatcher::new(loader, services.bus.clone());
        let broadcaster = Broadcaster::new(services.hosts, services.bus, settings.delivery);

        Self {
            state: CoordinatorState::new(registry),
            dispatcher: Arc::new(dispatcher),
            broadcaster: Arc::new(broadcaster),
            menus: services.menus,
            in_flight: JoinSet::new(),
        }
    }

    pub fn state(&self) -> &CoordinatorState {
        &self.state
    }

    pub fn handle(&mut self, msg: Msg) {
        while self.in_flight.try_join_next().is_some() {}

        let state = mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        if effects.is_empty() {
            relay_debug!("Message produced no effects");
        }
        for effect in effects {
            self.run(effect);
        }
    }

    /// Number of effect tasks that have not been reaped yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Waits for every in-flight effect to finish.
    pub async fn settle(&mut self) {
        while let Some(result) = self.in_flight.join_next().await {
            if let Err(err) = result {
                relay_warn!("Effect task ended abnormally: {}", err);
            }
        }
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::InstallMenus(entries) => {
                for entry in &entries {
                    if let Err(err) = self.menus.create_menu(entry) {
                        relay_warn!("Could not create menu entry {}: {}", entry.id, err);
                    }
                }
            }
            Effect::LoadAndParse(trigger) => {
                let dispatcher = self.dispatcher.clone();
                self.in_flight.spawn(async move {
                    dispatcher.on_trigger(trigger).await;
                });
            }
            Effect::BroadcastTask { tab_id, task } => {
                let broadcaster = self.broadcaster.clone();
                self.in_flight.spawn(async move {
                    broadcaster.broadcast(tab_id, &task).await;
                });
            }
        }
    }
}
