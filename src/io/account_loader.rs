//! Opening balance loader
//!
//! Reads an accounts CSV (`account,balance`) and creates every valid row in an
//! `AccountStore`. Rows that are malformed, duplicated or negative are logged
//! and skipped; only a file that can't be opened is fatal.

use crate::core::AccountStore;
use crate::io::csv_format::{convert_account_record, AccountCsvRecord};
use crate::types::TransferError;
use csv::{Position, ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;

/// Load accounts from `path` into `store`
///
/// # Returns
///
/// The number of accounts created.
pub fn load_accounts(path: &Path, store: &AccountStore) -> Result<usize, TransferError> {
    let file = std::fs::File::open(path).map_err(|e| TransferError::IoError {
        message: format!("Failed to open file '{}': {}", path.display(), e),
    })?;

    Ok(load_accounts_from_reader(file, store))
}

/// Load accounts from any reader into `store`
pub fn load_accounts_from_reader<R: Read>(reader: R, store: &AccountStore) -> usize {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            tracing::warn!("unreadable accounts header: {}", TransferError::from(e));
            return 0;
        }
    };

    let mut created = 0;
    let mut record = StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if e.is_io_error() => {
                tracing::warn!("stopped reading accounts: {}", TransferError::from(e));
                break;
            }
            Err(e) => {
                tracing::warn!("skipping account record: {}", TransferError::from(e));
                continue;
            }
        }

        let outcome = record
            .deserialize::<AccountCsvRecord>(Some(&headers))
            .map_err(TransferError::from)
            .and_then(convert_account_record)
            .and_then(|account| store.create_account(account));

        match (outcome, record.position().map(Position::line)) {
            (Ok(()), _) => created += 1,
            (Err(e), Some(line)) => tracing::warn!("skipping account record: {}", e.at_line(line)),
            (Err(e), None) => tracing::warn!("skipping account record: {}", e),
        }
    }

    created
}
