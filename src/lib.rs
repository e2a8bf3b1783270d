//! Rust Transfer Engine Library
//! # Overview
//!
//! This library keeps a set of monetary accounts in memory and moves money
//! between them under concurrent access, with no lost updates, no overdrafts
//! and no deadlocks, including when two accounts transfer to each other at the
//! same time.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, TransferRequest, TransferError)
//! - [`core`] - Business logic components:
//!   - [`core::account_store`] - Account ownership and the atomic pairwise transfer
//!   - [`core::coordinator`] - Business-rule validation and outcome mapping
//!   - [`core::notification`] - Best-effort notifications to account holders
//! - [`io`] - CSV intake and output
//! - [`strategy`] - Sequential and concurrent processing pipelines
//! - [`cli`] - CLI arguments parsing
//! - [`logging`] - Subscriber setup for the binary
//!
//! # Transfer Rules
//!
//! A transfer is rejected, in this order, when:
//!
//! - the amount is not greater than zero
//! - source and target are the same account
//! - the source, then the target, does not exist
//! - the source balance does not cover the amount at the moment of the atomic check
//!
//! # Example
//!
//! ```
//! use rust_transfer_engine::{Account, AccountStore, NoopNotifier, TransferCoordinator, TransferError};
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! let store = Arc::new(AccountStore::new());
//! store.create_account(Account::new("A", Decimal::new(500, 0))).unwrap();
//! store.create_account(Account::new("B", Decimal::new(500, 0))).unwrap();
//!
//! let coordinator = TransferCoordinator::new(Arc::clone(&store), Arc::new(NoopNotifier));
//! assert_eq!(
//!     coordinator.transfer("A", "B", Decimal::new(600, 0)),
//!     Err(TransferError::insufficient_funds("A", Decimal::new(600, 0)))
//! );
//! assert_eq!(store.get_account("A").unwrap().balance, Decimal::new(500, 0));
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use core::{AccountStore, LoggingNotifier, NoopNotifier, Notifier, TransferCoordinator};
pub use io::write_accounts_csv;
pub use types::{Account, AccountId, TransferError, TransferRequest};
