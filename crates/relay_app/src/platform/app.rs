use std::sync::Arc;

use anyhow::Context;
use relay_core::Msg;
use relay_engine::{Coordinator, PortHostProvider, Services};
use relay_logging::{relay_info, relay_warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::bridge::{decode_event, write_commands, Inbound, StdioBridge};
use super::config::{self, AppConfig};
use super::logging;

pub fn run_app() -> anyhow::Result<()> {
    let path = config::config_path();
    let config = config::load(&path)?;
    logging::initialize(config.log, config.level_filter());
    relay_info!("Loaded configuration from {:?}", path);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("could not start async runtime")?;
    runtime.block_on(serve(config))
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let registry = config.registry().context("invalid parser list")?;
    let hosts = PortHostProvider::new(&config.hosts.to_settings())
        .context("could not set up host channels")?;
    relay_info!("Relaying tasks to {} host ports", hosts.len());

    let (bridge, commands) = StdioBridge::new();
    let bridge = Arc::new(bridge);
    let writer = tokio::spawn(write_commands(commands, tokio::io::stdout()));

    let services = Services {
        hosts: Arc::new(hosts),
        injector: bridge.clone(),
        bus: bridge.clone(),
        menus: bridge.clone(),
    };
    let mut coordinator = Coordinator::new(registry, services, config.coordinator_settings());
    coordinator.handle(Msg::Startup);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("could not read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match decode_event(line) {
            Ok(event) => match Inbound::from(event) {
                Inbound::Msg(msg) => coordinator.handle(msg),
                Inbound::ScriptResult {
                    request_id,
                    outcome,
                } => bridge.complete_script(request_id, outcome),
            },
            Err(err) => relay_warn!("Skipping undecodable event: {}", err),
        }
    }

    relay_info!("Input closed; finishing {} in-flight tasks", coordinator.in_flight());
    // No further script results can arrive.
    bridge.abandon_pending();
    coordinator.settle().await;
    // Dropping the last bridge handles ends the writer.
    drop(coordinator);
    drop(bridge);
    writer
        .await
        .context("command writer panicked")?
        .context("could not write to stdout")?;
    Ok(())
}
