use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Apply account-to-account transfers and print the resulting balances
#[derive(Parser, Debug)]
#[command(name = "transfer-engine")]
#[command(about = "Apply account-to-account transfers and print the resulting balances", long_about = None)]
pub struct CliArgs {
    /// Accounts CSV file with opening balances
    #[arg(value_name = "ACCOUNTS", help = "Path to the accounts CSV file (account,balance)")]
    pub accounts_file: PathBuf,

    /// Transfers CSV file
    #[arg(value_name = "TRANSFERS", help = "Path to the transfers CSV file (from,to,amount)")]
    pub transfers_file: PathBuf,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for sequential or 'async' for concurrent batches"
    )]
    pub strategy: StrategyType,

    /// Number of transfers per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of transfers per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads processing transfers (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Per-lock acquisition timeout
    #[arg(
        long = "lock-timeout-ms",
        value_name = "MS",
        help = "Give up on a transfer whose account lock isn't acquired within MS milliseconds"
    )]
    pub lock_timeout_ms: Option<u64>,

    /// Log filter used when RUST_LOG is not set
    #[arg(
        long = "log-level",
        value_name = "FILTER",
        default_value = "warn",
        help = "Log filter directive, e.g. 'info' or 'notification=info' (RUST_LOG takes precedence)"
    )]
    pub log_level: String,
}

/// Available processing strategies
#[derive(Clone, Debug, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments, falling back to defaults
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Lock timeout, if one was requested
    pub fn lock_timeout(&self) -> Option<Duration> {
        self.lock_timeout_ms.map(Duration::from_millis)
    }
}
