//! Batch processing with debit-account partitioning for concurrent transfers
//!
//! This module provides the `BatchProcessor` struct, which runs a batch of
//! transfer requests on tokio tasks while keeping the outgoing transfers of
//! each account in their original order.
//!
//! # Design
//!
//! A batch is partitioned by debit (`from`) account. Each partition runs
//! sequentially on its own task; partitions run concurrently with each other.
//! Correctness across partitions (a credit landing while another task debits
//! the same account) is the account store's job, not the processor's.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     └── TransferCoordinator  (validation + atomic store transfer)
//! ```

use std::collections::HashMap;

use crate::core::TransferCoordinator;
use crate::types::{AccountId, TransferError, TransferRequest};

/// Result of processing a single transfer request
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The request that was processed
    pub request: TransferRequest,

    /// The outcome of the transfer
    pub result: Result<(), TransferError>,
}

/// Batch processor with debit-account partitioning
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Shared coordinator; clones share the same store
    coordinator: TransferCoordinator,
}

impl BatchProcessor {
    pub fn new(coordinator: TransferCoordinator) -> Self {
        Self { coordinator }
    }

    /// Partition a batch of requests by debit account
    ///
    /// # Guarantees
    ///
    /// - Each request appears in exactly one partition
    /// - Requests within a partition keep their original order
    pub fn partition_by_source(
        &self,
        batch: Vec<TransferRequest>,
    ) -> HashMap<AccountId, Vec<TransferRequest>> {
        let mut partitions: HashMap<AccountId, Vec<TransferRequest>> = HashMap::new();

        for request in batch {
            partitions
                .entry(request.from.clone())
                .or_default()
                .push(request);
        }

        partitions
    }

    /// Run one partition's requests in order
    ///
    /// Failures are captured in the results and don't stop the partition.
    pub async fn process_partition(&self, requests: Vec<TransferRequest>) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(requests.len());

        for request in requests {
            let result = self.coordinator.submit(&request);
            if let Err(e) = &result {
                tracing::warn!(from = %request.from, to = %request.to, amount = %request.amount, "transfer rejected: {}", e);
            }
            results.push(ProcessingResult { request, result });
        }

        results
    }

    /// Process a batch with one tokio task per debit account
    ///
    /// Waits for every task before returning. Results are grouped by
    /// partition; their order across partitions is unspecified.
    pub async fn process_batch(&self, batch: Vec<TransferRequest>) -> Vec<ProcessingResult> {
        let partitions = self.partition_by_source(batch);

        let mut tasks = Vec::with_capacity(partitions.len());
        for (_from, requests) in partitions {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.process_partition(requests).await
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(partition_results) => results.extend(partition_results),
                Err(e) => tracing::error!("transfer task panicked: {:?}", e),
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AccountStore, NoopNotifier};
    use crate::types::Account;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn processor_with(accounts: &[(&str, i64)]) -> (BatchProcessor, Arc<AccountStore>) {
        let store = Arc::new(AccountStore::new());
        for (id, balance) in accounts {
            store
                .create_account(Account::new(*id, Decimal::new(*balance, 0)))
                .unwrap();
        }
        let coordinator = TransferCoordinator::new(Arc::clone(&store), Arc::new(NoopNotifier));
        (BatchProcessor::new(coordinator), store)
    }

    fn request(from: &str, to: &str, amount: i64) -> TransferRequest {
        TransferRequest::new(from, to, Decimal::new(amount, 0))
    }

    #[test]
    fn test_partition_by_source_keeps_order() {
        let (processor, _) = processor_with(&[]);
        let batch = vec![
            request("A", "B", 1),
            request("B", "A", 2),
            request("A", "C", 3),
            request("A", "B", 4),
        ];

        let partitions = processor.partition_by_source(batch);

        assert_eq!(partitions.len(), 2);
        let amounts: Vec<Decimal> = partitions["A"].iter().map(|r| r.amount).collect();
        assert_eq!(
            amounts,
            vec![Decimal::new(1, 0), Decimal::new(3, 0), Decimal::new(4, 0)]
        );
        assert_eq!(partitions["B"].len(), 1);
    }

    #[tokio::test]
    async fn test_process_partition_continues_after_failure() {
        let (processor, store) = processor_with(&[("A", 100), ("B", 0)]);
        let requests = vec![
            request("A", "B", 60),
            request("A", "B", 60),
            request("A", "B", 40),
        ];

        let results = processor.process_partition(requests).await;

        assert!(results[0].result.is_ok());
        assert_eq!(
            results[1].result,
            Err(TransferError::insufficient_funds("A", Decimal::new(60, 0)))
        );
        assert!(results[2].result.is_ok());
        assert_eq!(store.get_account("A").unwrap().balance, Decimal::ZERO);
        assert_eq!(store.get_account("B").unwrap().balance, Decimal::new(100, 0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_process_batch_opposite_directions() {
        let (processor, store) = processor_with(&[("A", 500), ("B", 400)]);

        let results = processor
            .process_batch(vec![request("A", "B", 100), request("B", "A", 300)])
            .await;

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.result.is_ok()));
        assert_eq!(store.get_account("A").unwrap().balance, Decimal::new(700, 0));
        assert_eq!(store.get_account("B").unwrap().balance, Decimal::new(200, 0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_process_batch_conserves_total() {
        let (processor, store) = processor_with(&[("A", 1000), ("B", 1000), ("C", 1000), ("D", 1000)]);
        let ids = ["A", "B", "C", "D"];
        let batch: Vec<TransferRequest> = (0..400)
            .map(|i| request(ids[i % 4], ids[(i + 1 + i / 4) % 4], ((i % 7) + 1) as i64 * 10))
            .filter(|r| r.from != r.to)
            .collect();
        let submitted = batch.len();

        let results = processor.process_batch(batch).await;

        assert_eq!(results.len(), submitted);
        assert_eq!(store.total_balance(), Ok(Decimal::new(4000, 0)));
        assert!(store
            .all_accounts()
            .iter()
            .all(|account| account.balance >= Decimal::ZERO));
    }
}
