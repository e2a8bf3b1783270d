//! Processing strategy module for transfer processing
//!
//! This module defines the Strategy pattern for complete processing pipelines:
//! load opening balances, run every transfer through the coordinator, write the
//! final balances. Different execution models (sequential, concurrent batches)
//! can be selected at runtime.

use crate::cli::StrategyType;
use crate::core::AccountStore;
use crate::types::TransferError;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Counters for one processing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingSummary {
    /// Accounts created from the accounts file
    pub accounts: usize,
    /// Transfers applied
    pub applied: usize,
    /// Transfers rejected by the coordinator
    pub rejected: usize,
}

/// Processing strategy trait for complete transfer processing pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Load `accounts_path`, apply `transfers_path`, write final balances to `output`
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal conditions:
    /// - An input file cannot be opened
    /// - The async runtime cannot be created
    /// - Output cannot be written
    ///
    /// Rejected transfers and malformed rows are logged and counted, and
    /// processing continues with the next record.
    fn process(
        &self,
        accounts_path: &Path,
        transfers_path: &Path,
        output: &mut dyn Write,
    ) -> Result<ProcessingSummary, TransferError>;
}

/// Build the account store a run operates on
pub(crate) fn new_store(lock_timeout: Option<Duration>) -> AccountStore {
    match lock_timeout {
        Some(timeout) => AccountStore::with_lock_timeout(timeout),
        None => AccountStore::new(),
    }
}

/// Create a processing strategy
///
/// # Arguments
///
/// * `strategy_type` - Sync or Async
/// * `config` - Batch configuration for async processing (ignored for sync)
/// * `lock_timeout` - Optional per-lock acquisition timeout for the account store
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
    lock_timeout: Option<Duration>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(lock_timeout)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config, lock_timeout))
        }
    }
}
