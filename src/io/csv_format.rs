//! CSV format handling for account and transfer records
//!
//! This module centralizes all CSV format concerns, providing:
//! - `AccountCsvRecord` / `TransferCsvRecord` structures for deserialization
//! - Conversion from CSV records to domain types (request intake validation)
//! - Account output serialization
//!
//! All functions are pure (no file I/O) for easy testing.
//!
//! # Formats
//!
//! ```text
//! accounts.csv          transfers.csv           output
//! account,balance       from,to,amount          account,balance
//! Id-123,500            Id-123,Id-1234,100      Id-123,400
//! ```

use crate::types::{Account, TransferError, TransferRequest};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for an opening account balance
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AccountCsvRecord {
    pub account: String,
    pub balance: Option<String>,
}

/// CSV record structure for a transfer request
///
/// Every field is optional at the CSV level so that missing values are
/// reported as intake errors rather than opaque deserialization failures.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TransferCsvRecord {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<String>,
}

/// Parse a money value without rounding
///
/// Values with more fractional digits than `Decimal` can hold are rejected
/// instead of being rounded to fit.
fn parse_decimal(field: &str, raw: Option<String>) -> Result<Decimal, TransferError> {
    match raw {
        Some(value) if !value.trim().is_empty() => {
            Decimal::from_str_exact(value.trim()).map_err(|e| {
                let message = match e {
                    rust_decimal::Error::Underflow => {
                        format!("{} '{}' cannot be represented without rounding", field, value)
                    }
                    _ => format!("Invalid {} '{}'", field, value),
                };
                TransferError::invalid_record(None, message)
            })
        }
        _ => Err(TransferError::invalid_record(None, format!("Missing {}", field))),
    }
}

fn require_id(field: &str, raw: Option<String>) -> Result<String, TransferError> {
    match raw {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(TransferError::empty_account_id(field)),
    }
}

/// Convert an AccountCsvRecord to an Account
///
/// A missing balance opens the account at zero. Sign checks are left to
/// `AccountStore::create_account`.
pub fn convert_account_record(record: AccountCsvRecord) -> Result<Account, TransferError> {
    let id = require_id("account", Some(record.account))?;

    let balance = match record.balance {
        Some(raw) if !raw.trim().is_empty() => parse_decimal("balance", Some(raw))?,
        _ => Decimal::ZERO,
    };

    Ok(Account::new(id, balance))
}

/// Convert a TransferCsvRecord to a TransferRequest
///
/// Checks that both account ids are non-empty and that the amount is present
/// and numeric. Whether the amount is positive, and whether the accounts
/// exist, is decided by the coordinator.
pub fn convert_transfer_record(record: TransferCsvRecord) -> Result<TransferRequest, TransferError> {
    let from = require_id("from", record.from)?;
    let to = require_id("to", record.to)?;
    let amount = parse_decimal("amount", record.amount)?;

    Ok(TransferRequest { from, to, amount })
}

/// Write account states to CSV format
///
/// Columns: account, balance. Rows are sorted by account id; balances keep
/// their stored decimal scale.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), TransferError> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer.write_record(["account", "balance"])?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by(|a, b| a.id.cmp(&b.id));

    for account in sorted_accounts {
        writer.write_record(&[account.id, account.balance.to_string()])?;
    }

    writer.flush()?;

    Ok(())
}
