//! Notification sink for account holders
//!
//! The coordinator tells both holders about every successful transfer. Delivery
//! is best-effort: a failed notification is logged and dropped, it never fails
//! or rolls back the transfer that triggered it.

use crate::types::Account;
use thiserror::Error;

/// Failure reported by a notification sink
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Failed to notify holder of account {account}: {reason}")]
pub struct NotificationError {
    /// Account whose holder could not be reached
    pub account: String,
    /// Sink-specific reason
    pub reason: String,
}

impl NotificationError {
    pub fn new(account: &str, reason: impl Into<String>) -> Self {
        NotificationError {
            account: account.to_string(),
            reason: reason.into(),
        }
    }
}

/// Delivers a message to the holder of an account
///
/// Implementations may be synchronous or hand the message off to a background
/// worker; either way `notify` must return promptly since it runs on the
/// transfer path (after the locks have been released).
pub trait Notifier: Send + Sync {
    fn notify(&self, account: &Account, message: &str) -> Result<(), NotificationError>;
}

/// Notifier that records every message as a `tracing` event
///
/// Events are emitted at `info` level under the `notification` target, so they
/// can be filtered independently (`RUST_LOG=notification=info`).
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn notify(&self, account: &Account, message: &str) -> Result<(), NotificationError> {
        tracing::info!(target: "notification", account = %account.id, "{}", message);
        Ok(())
    }
}

/// Notifier that drops every message
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _account: &Account, _message: &str) -> Result<(), NotificationError> {
        Ok(())
    }
}
