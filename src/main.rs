//! Rust Transfer Engine CLI
//!
//! Loads opening balances, applies a file of transfers, and prints the final
//! balances as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- accounts.csv transfers.csv > balances.csv
//! cargo run -- --strategy sync accounts.csv transfers.csv > balances.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 accounts.csv transfers.csv
//! cargo run -- --lock-timeout-ms 50 --log-level info accounts.csv transfers.csv
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success (individual rejected transfers are logged, not fatal)
//! - 1: Error (missing arguments, file not found, output not writable, etc.)

use rust_transfer_engine::cli;
use rust_transfer_engine::logging;
use rust_transfer_engine::strategy;
use std::process;

fn main() {
    let args = cli::parse_args();

    logging::init_logging(&args.log_level);

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), config, args.lock_timeout())
    };

    let mut output = std::io::stdout();
    match strategy.process(&args.accounts_file, &args.transfers_file, &mut output) {
        Ok(summary) => tracing::info!(
            accounts = summary.accounts,
            applied = summary.applied,
            rejected = summary.rejected,
            "processing complete"
        ),
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
