//! Notifications shown after a write
//!
//! Success and failure of every form and dialog is reported as a
//! `Notification` handed to a `Notifier`.

use serde::Serialize;
use std::sync::{Arc, Mutex};

use crate::api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Default,
        }
    }

    pub fn failure(description: impl Into<String>) -> Self {
        Self {
            title: "Error!".to_string(),
            description: description.into(),
            variant: Variant::Destructive,
        }
    }

    /// Failure notice for `error`: the server's `message`, else its `error`,
    /// else `fallback`
    pub fn from_error(error: &ApiError, fallback: &str) -> Self {
        Self::failure(error.user_message(fallback))
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == Variant::Destructive
    }
}

/// Sink for notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            Variant::Default => {
                tracing::info!("{} {}", notification.title, notification.description)
            }
            Variant::Destructive => {
                tracing::warn!("{} {}", notification.title, notification.description)
            }
        }
    }
}

/// Keeps every notification it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.all().pop()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_error_prefers_server_text() {
        let err = ApiError::Status {
            status: 422,
            message: None,
            error: Some("Unprocessable Entity".into()),
        };
        let notice = Notification::from_error(&err, "An error occurred while creating the category.");
        assert_eq!(notice.description, "Unprocessable Entity");
        assert!(notice.is_destructive());
    }

    #[test]
    fn test_from_error_transport_failure_uses_fallback() {
        let err = ApiError::Network("connection refused".into());
        let notice = Notification::from_error(&err, "An error occurred while deleting.");
        assert_eq!(notice.description, "An error occurred while deleting.");
    }

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::success("Success!", "Saved"));
        notifier.notify(Notification::failure("Nope"));

        assert_eq!(notifier.all().len(), 2);
        assert_eq!(notifier.last().unwrap().description, "Nope");
    }
}
