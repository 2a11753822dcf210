use std::sync::Arc;

use futures_util::future::join_all;
use relay_core::{Message, TabId};
use relay_logging::{relay_debug, relay_info, relay_trace};

use crate::{ContentBus, DeliveryMode, HostChannel, HostProvider};

/// Fans one task out to every reachable host, then tells the origin tab it is done.
pub struct Broadcaster {
    hosts: Arc<dyn HostProvider>,
    bus: Arc<dyn ContentBus>,
    mode: DeliveryMode,
}

impl Broadcaster {
    pub fn new(hosts: Arc<dyn HostProvider>, bus: Arc<dyn ContentBus>, mode: DeliveryMode) -> Self {
        Self { hosts, bus, mode }
    }

    /// Attempts every host exactly once and always ends with a `TaskSent` to `origin_tab`.
    ///
    /// `TaskSent` is sent only after every attempt has settled. Per-host outcomes are
    /// logged, never returned.
    pub async fn broadcast(&self, origin_tab: TabId, task: &str) {
        let hosts = self.hosts.hosts().await;

        let delivered = match self.mode {
            DeliveryMode::Sequential => {
                let mut delivered = 0;
                for host in &hosts {
                    if attempt(host.as_ref(), task).await {
                        delivered += 1;
                    }
                }
                delivered
            }
            DeliveryMode::Concurrent => {
                let attempts = hosts.iter().map(|host| attempt(host.as_ref(), task));
                join_all(attempts)
                    .await
                    .into_iter()
                    .filter(|delivered| *delivered)
                    .count()
            }
        };

        relay_info!(
            "Task from tab {} delivered to {}/{} hosts",
            origin_tab,
            delivered,
            hosts.len()
        );

        if let Err(err) = self.bus.send(origin_tab, Message::TaskSent).await {
            relay_debug!("TaskSent to tab {} not delivered: {}", origin_tab, err);
        }
    }
}

async fn attempt(host: &dyn HostChannel, task: &str) -> bool {
    match host.send(task).await {
        Ok(()) => {
            relay_trace!("Host {} accepted task", host.name());
            true
        }
        Err(err) => {
            relay_debug!("Host {} did not take task: {}", host.name(), err);
            false
        }
    }
}
