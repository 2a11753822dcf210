use std::fmt;

use relay_core::TabId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
    pub kind: HostFailureKind,
    pub message: String,
}

impl HostError {
    pub fn new(kind: HostFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for HostError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostFailureKind {
    InvalidEndpoint,
    HttpStatus(u16),
    Timeout,
    Network,
    /// The host refused the task for a reason of its own.
    Rejected,
}

impl fmt::Display for HostFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostFailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            HostFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            HostFailureKind::Timeout => write!(f, "timeout"),
            HostFailureKind::Network => write!(f, "network error"),
            HostFailureKind::Rejected => write!(f, "rejected"),
        }
    }
}

/// Failures reported by the browser side: script injection, tab messaging, menus.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrowserError {
    #[error("tab {0} is not available")]
    TabUnavailable(TabId),
    #[error("rejected by browser: {0}")]
    Rejected(String),
    #[error("browser bridge is closed")]
    BridgeClosed,
}

/// Whether the content agent can be addressed after a load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Ready,
    Unavailable,
}

impl LoadOutcome {
    pub fn is_ready(self) -> bool {
        self == LoadOutcome::Ready
    }
}

/// How a broadcast walks the host set. Both settle every host before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeliveryMode {
    /// One host at a time, in host-set order.
    #[default]
    Sequential,
    /// All hosts in flight at once.
    Concurrent,
}
