//! Core business logic module
//!
//! This module contains the transfer processing components:
//! - `account_store` - Account ownership and the atomic pairwise transfer
//! - `coordinator` - Transfer validation and outcome mapping
//! - `notification` - Best-effort notification sink for account holders
//! - `async` - Concurrent batch execution on tokio

pub mod account_store;
pub mod r#async;
pub mod coordinator;
pub mod notification;

pub use account_store::AccountStore;
pub use coordinator::TransferCoordinator;
pub use notification::{LoggingNotifier, NoopNotifier, NotificationError, Notifier};
pub use r#async::{BatchProcessor, ProcessingResult};
