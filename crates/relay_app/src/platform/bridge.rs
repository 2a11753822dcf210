//! Newline-delimited JSON bridge to the browser-side shim.
//!
//! Events arrive on stdin, commands leave on stdout, one JSON object per line.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use relay_core::{MenuEntry, Message, Msg, SenderContext, TabId};
use relay_engine::{BrowserError, ContentBus, MenuSurface, ScriptInjector};
use relay_logging::relay_debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BrowserEvent {
    Startup,
    ToolbarClicked {
        tab_id: TabId,
    },
    MenuClicked {
        tab_id: TabId,
        menu_item_id: String,
    },
    RuntimeMessage {
        message: Value,
        #[serde(default)]
        sender: SenderContext,
    },
    /// Outcome of an earlier `execute_script` command.
    ScriptResult {
        request_id: u64,
        ok: bool,
        #[serde(default)]
        error: Option<String>,
    },
}

/// Where a decoded event goes: the coordinator, or a pending injection.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Msg(Msg),
    ScriptResult {
        request_id: u64,
        outcome: Result<(), BrowserError>,
    },
}

impl From<BrowserEvent> for Inbound {
    fn from(event: BrowserEvent) -> Self {
        match event {
            BrowserEvent::Startup => Inbound::Msg(Msg::Startup),
            BrowserEvent::ToolbarClicked { tab_id } => Inbound::Msg(Msg::ToolbarClicked { tab_id }),
            BrowserEvent::MenuClicked {
                tab_id,
                menu_item_id,
            } => Inbound::Msg(Msg::MenuClicked {
                tab_id,
                menu_item_id,
            }),
            BrowserEvent::RuntimeMessage { message, sender } => {
                Inbound::Msg(Msg::ContentMessage { message, sender })
            }
            BrowserEvent::ScriptResult {
                request_id,
                ok,
                error,
            } => Inbound::ScriptResult {
                request_id,
                outcome: if ok {
                    Ok(())
                } else {
                    Err(BrowserError::Rejected(
                        error.unwrap_or_else(|| "injection failed".to_string()),
                    ))
                },
            },
        }
    }
}

pub fn decode_event(line: &str) -> Result<BrowserEvent, serde_json::Error> {
    serde_json::from_str(line)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum OutboundCommand {
    CreateMenu(MenuEntry),
    ExecuteScript {
        request_id: u64,
        tab_id: TabId,
        file: String,
    },
    SendMessage {
        tab_id: TabId,
        message: Message,
    },
}

type ScriptWaiter = oneshot::Sender<Result<(), BrowserError>>;

#[derive(Default)]
struct PendingScripts {
    waiters: HashMap<u64, ScriptWaiter>,
    /// Set once the shim can no longer answer.
    closed: bool,
}

/// Browser capabilities backed by the stdout command stream.
///
/// Script injections resolve only when the shim answers with a matching
/// `script_result` event.
pub struct StdioBridge {
    tx: mpsc::UnboundedSender<OutboundCommand>,
    next_request: AtomicU64,
    pending: Mutex<PendingScripts>,
}

impl StdioBridge {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let bridge = Self {
            tx,
            next_request: AtomicU64::new(1),
            pending: Mutex::new(PendingScripts::default()),
        };
        (bridge, rx)
    }

    /// Resolves the injection waiting on `request_id`. Unknown ids are ignored.
    pub fn complete_script(&self, request_id: u64, outcome: Result<(), BrowserError>) {
        match self.lock_pending().waiters.remove(&request_id) {
            Some(waiter) => {
                let _ = waiter.send(outcome);
            }
            None => relay_debug!("No injection is waiting on request {}", request_id),
        }
    }

    /// Fails every injection still waiting for a result, and any started later.
    pub fn abandon_pending(&self) {
        let mut pending = self.lock_pending();
        pending.closed = true;
        pending.waiters.clear();
    }

    fn lock_pending(&self) -> MutexGuard<'_, PendingScripts> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn queue(&self, command: OutboundCommand) -> Result<(), BrowserError> {
        self.tx
            .send(command)
            .map_err(|_| BrowserError::BridgeClosed)
    }
}

#[async_trait::async_trait]
impl ScriptInjector for StdioBridge {
    async fn execute_script(&self, tab_id: TabId, script: &str) -> Result<(), BrowserError> {
        let request_id = self.next_request.fetch_add(1, Ordering::Relaxed);
        let (waiter, result) = oneshot::channel();
        {
            let mut pending = self.lock_pending();
            if pending.closed {
                return Err(BrowserError::BridgeClosed);
            }
            pending.waiters.insert(request_id, waiter);
        }

        let queued = self.queue(OutboundCommand::ExecuteScript {
            request_id,
            tab_id,
            file: script.to_string(),
        });
        if let Err(err) = queued {
            self.lock_pending().waiters.remove(&request_id);
            return Err(err);
        }

        // A dropped waiter means the bridge gave up on the shim.
        result.await.unwrap_or(Err(BrowserError::BridgeClosed))
    }
}

#[async_trait::async_trait]
impl ContentBus for StdioBridge {
    async fn send(&self, tab_id: TabId, message: Message) -> Result<(), BrowserError> {
        self.queue(OutboundCommand::SendMessage { tab_id, message })
    }
}

impl MenuSurface for StdioBridge {
    fn create_menu(&self, entry: &MenuEntry) -> Result<(), BrowserError> {
        self.queue(OutboundCommand::CreateMenu(entry.clone()))
    }
}

/// Writes queued commands as JSON lines until every bridge handle is dropped.
pub async fn write_commands<W>(
    mut commands: mpsc::UnboundedReceiver<OutboundCommand>,
    mut writer: W,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(command) = commands.recv().await {
        let mut line = serde_json::to_vec(&command)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
    Ok(())
}
