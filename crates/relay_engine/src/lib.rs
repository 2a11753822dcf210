//! Relay engine: async effect execution, host fan-out and content-agent plumbing.
mod broadcast;
mod browser;
mod coordinator;
mod dispatcher;
mod host;
mod loader;
mod types;

pub use broadcast::Broadcaster;
pub use browser::{ContentBus, MenuSurface, ScriptInjector};
pub use coordinator::{Coordinator, CoordinatorSettings, Services};
pub use dispatcher::Dispatcher;
pub use host::{
    HostChannel, HostProvider, HostSettings, HttpHost, PortHostProvider, StaticHostProvider,
    DEFAULT_HOST_PORTS,
};
pub use loader::{ScriptLoader, DEFAULT_CONTENT_SCRIPT};
pub use types::{BrowserError, DeliveryMode, HostError, HostFailureKind, LoadOutcome};
