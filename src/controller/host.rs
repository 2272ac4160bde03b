use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Services the embedding application provides to a form.
pub trait HostEnvironment {
    fn notify(&self, notification: Notification);

    /// Asks the user for a line of text. `None` means the prompt was cancelled.
    fn prompt(&self, message: &str, default: &str) -> Option<String>;

    fn open_window(&self, url: &str, name: &str, options: &str);
}
