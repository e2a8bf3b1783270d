//! Synchronous processing strategy
//!
//! Applies transfers one at a time in file order on the calling thread.
//! Given the same inputs it always produces the same output, which makes it
//! the reference the concurrent strategy is compared against.
//!
//! # Design
//!
//! The SyncProcessingStrategy only orchestrates, delegating:
//! - Opening balances to `account_loader::load_accounts`
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Validation and the balance mutation to `TransferCoordinator`
//! - CSV output to `csv_format::write_accounts_csv`

use crate::core::{LoggingNotifier, TransferCoordinator};
use crate::io::account_loader::load_accounts;
use crate::io::csv_format::write_accounts_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{new_store, ProcessingStrategy, ProcessingSummary};
use crate::types::TransferError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use rust_transfer_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::default();
/// let mut output = io::stdout();
///
/// strategy
///     .process(Path::new("accounts.csv"), Path::new("transfers.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncProcessingStrategy {
    lock_timeout: Option<Duration>,
}

impl SyncProcessingStrategy {
    pub fn new(lock_timeout: Option<Duration>) -> Self {
        Self { lock_timeout }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(
        &self,
        accounts_path: &Path,
        transfers_path: &Path,
        output: &mut dyn Write,
    ) -> Result<ProcessingSummary, TransferError> {
        let store = Arc::new(new_store(self.lock_timeout));
        let mut summary = ProcessingSummary {
            accounts: load_accounts(accounts_path, &store)?,
            ..ProcessingSummary::default()
        };

        let coordinator = TransferCoordinator::new(Arc::clone(&store), Arc::new(LoggingNotifier));
        let reader = SyncReader::new(transfers_path)?;

        for result in reader {
            match result {
                Ok(request) => match coordinator.submit(&request) {
                    Ok(()) => summary.applied += 1,
                    Err(e) => {
                        summary.rejected += 1;
                        tracing::warn!(from = %request.from, to = %request.to, amount = %request.amount, "transfer rejected: {}", e);
                    }
                },
                Err(e) => tracing::warn!("skipping transfer record: {}", e),
            }
        }

        write_accounts_csv(&store.all_accounts(), output)?;

        Ok(summary)
    }
}
