#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use relay_core::{MenuEntry, Message, TabId};
use relay_engine::{
    BrowserError, ContentBus, HostChannel, HostError, HostFailureKind, MenuSurface,
    ScriptInjector, Services, StaticHostProvider,
};

/// Ordered record of everything the fakes observed.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.snapshot()
            .iter()
            .filter(|event| event.starts_with(prefix))
            .count()
    }
}

pub struct FakeHost {
    name: String,
    accept: bool,
    delay: Duration,
    log: EventLog,
}

impl FakeHost {
    pub fn accepting(name: &str, log: &EventLog) -> Arc<dyn HostChannel> {
        Self::with(name, true, Duration::ZERO, log)
    }

    pub fn rejecting(name: &str, log: &EventLog) -> Arc<dyn HostChannel> {
        Self::with(name, false, Duration::ZERO, log)
    }

    pub fn with(name: &str, accept: bool, delay: Duration, log: &EventLog) -> Arc<dyn HostChannel> {
        Arc::new(Self {
            name: name.to_string(),
            accept,
            delay,
            log: log.clone(),
        })
    }
}

#[async_trait::async_trait]
impl HostChannel for FakeHost {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, content: &str) -> Result<(), HostError> {
        self.log.push(format!("send:{}:{}", self.name, content));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.log.push(format!("settled:{}", self.name));
        if self.accept {
            Ok(())
        } else {
            Err(HostError::new(HostFailureKind::Rejected, "closed"))
        }
    }
}

pub struct FakeBrowser {
    inject_ok: bool,
    bus_ok: bool,
    log: EventLog,
}

impl FakeBrowser {
    pub fn new(inject_ok: bool, log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            inject_ok,
            bus_ok: true,
            log: log.clone(),
        })
    }

    pub fn with_broken_bus(log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            inject_ok: true,
            bus_ok: false,
            log: log.clone(),
        })
    }
}

#[async_trait::async_trait]
impl ScriptInjector for FakeBrowser {
    async fn execute_script(&self, tab_id: TabId, script: &str) -> Result<(), BrowserError> {
        self.log.push(format!("inject:{tab_id}:{script}"));
        if self.inject_ok {
            Ok(())
        } else {
            Err(BrowserError::Rejected("already loaded".to_string()))
        }
    }
}

#[async_trait::async_trait]
impl ContentBus for FakeBrowser {
    async fn send(&self, tab_id: TabId, message: Message) -> Result<(), BrowserError> {
        let event = match &message {
            Message::Parse { parser_name } => format!("parse:{tab_id}:{parser_name:?}"),
            Message::SendTask { message } => format!("send_task:{tab_id}:{message}"),
            Message::TaskSent => format!("task_sent:{tab_id}"),
        };
        self.log.push(event);
        if self.bus_ok {
            Ok(())
        } else {
            Err(BrowserError::TabUnavailable(tab_id))
        }
    }
}

impl MenuSurface for FakeBrowser {
    fn create_menu(&self, entry: &MenuEntry) -> Result<(), BrowserError> {
        self.log.push(format!("menu:{}", entry.id));
        Ok(())
    }
}

pub fn services(hosts: Vec<Arc<dyn HostChannel>>, browser: Arc<FakeBrowser>) -> Services {
    Services {
        hosts: Arc::new(StaticHostProvider::new(hosts)),
        injector: browser.clone(),
        bus: browser.clone(),
        menus: browser,
    }
}
