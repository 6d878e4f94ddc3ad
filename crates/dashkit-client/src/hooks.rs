//! Host integration seams: user-visible notifications and navigation.

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Receives user-visible messages (a toast, a status bar, a log line).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Performs the hard navigation used on unrecoverable auth failure.
pub trait Navigator: Send + Sync {
    fn redirect_to(&self, path: &str);
}

/// Default sink that routes notifications to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => tracing::info!("{message}"),
            Severity::Error => tracing::warn!("{message}"),
        }
    }
}
