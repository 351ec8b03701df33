//! Status reporting interfaces.
//!
//! The core never renders anything itself; it hands human-readable status
//! strings to a sink the host provides. Two channels exist, matching the
//! host UI: a sync status line (with a level) and toast notifications.

use std::time::Duration;

/// How long the host should keep a status message visible
pub const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(5);

/// How long the host should keep a toast notification visible
pub const NOTIFICATION_CLEAR_DELAY: Duration = Duration::from_secs(3);

/// Severity of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
}

impl StatusLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLevel::Info => "info",
            StatusLevel::Success => "success",
        }
    }
}

/// Sink for user-facing status strings, implemented by the host.
pub trait StatusSink: Send + Sync {
    /// Sync status line, auto-cleared by the host after
    /// [`STATUS_CLEAR_DELAY`]
    fn sync_status(&self, message: &str, level: StatusLevel);

    /// Toast notification, auto-cleared by the host after
    /// [`NOTIFICATION_CLEAR_DELAY`]
    fn notify(&self, message: &str);
}

/// Sink that forwards everything to the tracing subscriber. Useful for
/// headless hosts and as a default.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl StatusSink for LogSink {
    fn sync_status(&self, message: &str, level: StatusLevel) {
        tracing::info!(level = level.as_str(), "{}", message);
    }

    fn notify(&self, message: &str) {
        tracing::info!("{}", message);
    }
}

/// Sink that records everything it receives. Shared by tests across
/// modules.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingSink {
    pub statuses: std::sync::Mutex<Vec<(String, StatusLevel)>>,
    pub notifications: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl StatusSink for RecordingSink {
    fn sync_status(&self, message: &str, level: StatusLevel) {
        self.statuses
            .lock()
            .unwrap()
            .push((message.to_string(), level));
    }

    fn notify(&self, message: &str) {
        self.notifications.lock().unwrap().push(message.to_string());
    }
}
