//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account and account identifier
//! - `transfer`: Transfer requests
//! - `error`: Error types for the transfer engine

pub mod account;
pub mod error;
pub mod transfer;

pub use account::{Account, AccountId};
pub use error::TransferError;
pub use transfer::TransferRequest;
