//! Asynchronous batch processing strategy
//!
//! Applies transfers concurrently on a tokio multi-threaded runtime.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (debit-account partitioning + tasks)
//!     └── TransferCoordinator
//!         └── AccountStore (per-account locks, canonical lock order)
//! ```
//!
//! # Ordering
//!
//! - Batches are processed one after another
//! - Within a batch, each debit account's transfers run in file order on one task
//! - Transfers from different debit accounts race; the store keeps every
//!   interleaving atomic and deadlock-free, but which one wins a contested
//!   balance is not specified

use crate::core::{BatchProcessor, LoggingNotifier, TransferCoordinator};
use crate::io::account_loader::load_accounts;
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_accounts_csv;
use crate::strategy::{new_store, ProcessingStrategy, ProcessingSummary};
use crate::types::TransferError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for batch processing
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of transfers per batch
    pub batch_size: usize,
    /// Number of runtime worker threads
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a BatchConfig, replacing zero values with the defaults
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size,
                default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                "Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches,
                default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    lock_timeout: Option<Duration>,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig, lock_timeout: Option<Duration>) -> Self {
        Self {
            config,
            lock_timeout,
        }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(
        &self,
        accounts_path: &Path,
        transfers_path: &Path,
        output: &mut dyn Write,
    ) -> Result<ProcessingSummary, TransferError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| TransferError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(async {
            let store = Arc::new(new_store(self.lock_timeout));
            let mut summary = ProcessingSummary {
                accounts: load_accounts(accounts_path, &store)?,
                ..ProcessingSummary::default()
            };

            let coordinator =
                TransferCoordinator::new(Arc::clone(&store), Arc::new(LoggingNotifier));
            let processor = BatchProcessor::new(coordinator);

            let file = tokio::fs::File::open(transfers_path)
                .await
                .map_err(|e| TransferError::IoError {
                    message: format!("Failed to open file '{}': {}", transfers_path.display(), e),
                })?;
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                // Wait for the whole batch so a debit account's transfers
                // spanning two batches still run in file order
                for result in processor.process_batch(batch).await {
                    match result.result {
                        Ok(()) => summary.applied += 1,
                        Err(_) => summary.rejected += 1,
                    }
                }
            }

            write_accounts_csv(&store.all_accounts(), output)?;

            Ok(summary)
        })
    }
}
