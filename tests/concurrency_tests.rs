//! Concurrency integration tests
//!
//! Drives the public API from many threads at once and checks the properties
//! that must hold under any interleaving: money is conserved, balances never go
//! negative, and opposite-direction transfers between the same pair of accounts
//! always complete.

use rstest::rstest;
use rust_decimal::Decimal;
use rust_transfer_engine::core::BatchProcessor;
use rust_transfer_engine::{
    Account, AccountStore, NoopNotifier, TransferCoordinator, TransferError, TransferRequest,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

fn coordinator_with(accounts: &[(&str, i64)], store: AccountStore) -> TransferCoordinator {
    for (id, balance) in accounts {
        store
            .create_account(Account::new(*id, Decimal::new(*balance, 0)))
            .unwrap();
    }
    TransferCoordinator::new(Arc::new(store), Arc::new(NoopNotifier))
}

#[test]
fn test_concurrent_opposite_transfers_complete() {
    let coordinator = coordinator_with(&[("A", 500), ("B", 400)], AccountStore::new());
    let barrier = Barrier::new(2);

    thread::scope(|s| {
        s.spawn(|| {
            barrier.wait();
            coordinator.transfer("A", "B", Decimal::new(200, 0))
        });
        s.spawn(|| {
            barrier.wait();
            coordinator.transfer("B", "A", Decimal::new(500, 0))
        });
    });

    // B can only cover 500 after A's transfer lands, so the outcome depends on
    // which thread wins; both end states conserve the total.
    let a = coordinator.store().get_account("A").unwrap().balance;
    let b = coordinator.store().get_account("B").unwrap().balance;
    assert_eq!(a + b, Decimal::new(900, 0));
    assert!(
        (a, b) == (Decimal::new(800, 0), Decimal::new(100, 0))
            || (a, b) == (Decimal::new(300, 0), Decimal::new(600, 0))
    );
}

#[test]
fn test_many_threads_opposite_directions_no_deadlock() {
    let coordinator = coordinator_with(&[("A", 10_000), ("B", 10_000)], AccountStore::new());
    let threads = 8;
    let iterations = 500;

    thread::scope(|s| {
        for t in 0..threads {
            let coordinator = &coordinator;
            s.spawn(move || {
                let (from, to) = if t % 2 == 0 { ("A", "B") } else { ("B", "A") };
                for _ in 0..iterations {
                    coordinator.transfer(from, to, Decimal::ONE).unwrap();
                }
            });
        }
    });

    // Equal numbers of threads in each direction cancel out
    let store = coordinator.store();
    assert_eq!(store.get_account("A").unwrap().balance, Decimal::new(10_000, 0));
    assert_eq!(store.get_account("B").unwrap().balance, Decimal::new(10_000, 0));
}

#[rstest]
#[case::no_timeout(AccountStore::new())]
#[case::generous_timeout(AccountStore::with_lock_timeout(Duration::from_secs(5)))]
fn test_random_ring_conserves_total_and_never_overdraws(#[case] store: AccountStore) {
    let ids = ["A", "B", "C", "D", "E"];
    let accounts: Vec<(&str, i64)> = ids.iter().map(|id| (*id, 100)).collect();
    let coordinator = coordinator_with(&accounts, store);
    let applied = AtomicUsize::new(0);
    let rejected = AtomicUsize::new(0);

    thread::scope(|s| {
        for t in 0..ids.len() {
            let coordinator = &coordinator;
            let applied = &applied;
            let rejected = &rejected;
            s.spawn(move || {
                for i in 0..200 {
                    let from = ids[(t + i) % ids.len()];
                    let to = ids[(t + i * 3 + 1) % ids.len()];
                    let amount = Decimal::new(((t + i) % 40 + 1) as i64, 0);
                    match coordinator.transfer(from, to, amount) {
                        Ok(()) => applied.fetch_add(1, Ordering::Relaxed),
                        Err(TransferError::InsufficientFunds { .. })
                        | Err(TransferError::SameAccount { .. }) => {
                            rejected.fetch_add(1, Ordering::Relaxed)
                        }
                        Err(e) => panic!("unexpected error: {}", e),
                    };
                }
            });
        }
    });

    let store = coordinator.store();
    assert_eq!(store.total_balance(), Ok(Decimal::new(500, 0)));
    assert!(store
        .all_accounts()
        .iter()
        .all(|account| account.balance >= Decimal::ZERO));
    assert_eq!(
        applied.load(Ordering::Relaxed) + rejected.load(Ordering::Relaxed),
        ids.len() * 200
    );
}

#[test]
fn test_concurrent_drain_allows_exactly_one() {
    let coordinator = coordinator_with(&[("A", 100), ("B", 0), ("C", 0)], AccountStore::new());
    let barrier = Barrier::new(2);

    let results: Vec<Result<(), TransferError>> = thread::scope(|s| {
        let handles: Vec<_> = ["B", "C"]
            .into_iter()
            .map(|to| {
                let coordinator = &coordinator;
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    coordinator.transfer("A", to, Decimal::new(100, 0))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results.iter().filter(|r| r.is_err()).cloned().collect::<Vec<_>>(),
        vec![Err(TransferError::insufficient_funds("A", Decimal::new(100, 0)))]
    );
    assert_eq!(coordinator.store().get_account("A").unwrap().balance, Decimal::ZERO);
}

#[test]
fn test_concurrent_create_same_id_one_wins() {
    let store = AccountStore::new();
    let barrier = Barrier::new(4);

    let created = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = &store;
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    store.create_account(Account::new("A", Decimal::new(i, 0)))
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Result::is_ok)
            .count()
    });

    assert_eq!(created, 1);
    assert_eq!(store.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_batch_processor_opposite_directions() {
    let coordinator = coordinator_with(&[("A", 1_000), ("B", 1_000)], AccountStore::new());
    let processor = BatchProcessor::new(coordinator.clone());

    let mut batch = Vec::new();
    for _ in 0..100 {
        batch.push(TransferRequest::new("A", "B", Decimal::new(3, 0)));
        batch.push(TransferRequest::new("B", "A", Decimal::new(2, 0)));
    }

    let results = processor.process_batch(batch).await;

    assert_eq!(results.len(), 200);
    assert!(results.iter().all(|r| r.result.is_ok()));
    let store = coordinator.store();
    assert_eq!(store.get_account("A").unwrap().balance, Decimal::new(900, 0));
    assert_eq!(store.get_account("B").unwrap().balance, Decimal::new(1_100, 0));
}
