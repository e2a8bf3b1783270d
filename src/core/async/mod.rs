//! Asynchronous execution of transfer batches
//!
//! The account store and coordinator are already thread-safe, so the async
//! side only needs a way to fan a batch out over tokio tasks:
//!
//! - **BatchProcessor**: partitions a batch by debit account and runs the
//!   partitions concurrently
//!
//! # Thread Safety
//!
//! - Transfers from different debit accounts proceed in parallel
//! - Transfers from the same debit account run in file order
//! - Overlapping account pairs are serialized by the store's per-account locks

pub mod batch_processor;

pub use batch_processor::{BatchProcessor, ProcessingResult};
