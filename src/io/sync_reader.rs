//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over transfer requests from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<TransferRequest, TransferError>` for each CSV row:
//!
//! ```no_run
//! use rust_transfer_engine::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("transfers.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(request) => println!("Transfer: {:?}", request),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record errors are yielded as Err variants carrying the physical
//!   line the record starts on (quoted fields may span several lines)

use crate::io::csv_format::{convert_transfer_record, TransferCsvRecord};
use crate::types::{TransferError, TransferRequest};
use csv::{Position, ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous transfer CSV reader
///
/// Reads one record at a time; memory use does not grow with file size.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
}

impl SyncReader {
    /// Open a transfers CSV file for streaming
    ///
    /// The CSV reader trims whitespace from all fields and tolerates short rows
    /// (missing fields become intake errors on that row).
    pub fn new(path: &Path) -> Result<Self, TransferError> {
        let file = File::open(path).map_err(|e| TransferError::IoError {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);
        let headers = reader.headers()?.clone();

        Ok(Self { reader, headers })
    }
}

impl Iterator for SyncReader {
    type Item = Result<TransferRequest, TransferError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => return Some(Err(TransferError::from(e))),
        }

        let line = record.position().map(Position::line);
        let result = record
            .deserialize::<TransferCsvRecord>(Some(&self.headers))
            .map_err(TransferError::from)
            .and_then(convert_transfer_record);

        Some(match line {
            Some(line) => result.map_err(|e| e.at_line(line)),
            None => result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_sync_reader_reads_requests_in_order() {
        let file = create_temp_csv("from,to,amount\nA,B,100\nB, A ,25.5\n");

        let requests: Vec<TransferRequest> = SyncReader::new(file.path())
            .unwrap()
            .map(Result::unwrap)
            .collect();

        assert_eq!(
            requests,
            vec![
                TransferRequest::new("A", "B", Decimal::new(100, 0)),
                TransferRequest::new("B", "A", Decimal::new(255, 1)),
            ]
        );
    }

    #[test]
    fn test_sync_reader_reports_bad_rows_and_continues() {
        let file = create_temp_csv("from,to,amount\nA,B,abc\n,B,1\nA,C,5\n");

        let results: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0],
            Err(TransferError::invalid_record(Some(2), "Invalid amount 'abc'"))
        );
        assert_eq!(results[1], Err(TransferError::empty_account_id("from")));
        assert_eq!(
            results[2],
            Ok(TransferRequest::new("A", "C", Decimal::new(5, 0)))
        );
    }

    #[test]
    fn test_sync_reader_short_row_is_missing_amount() {
        let file = create_temp_csv("from,to,amount\nA,B\n");

        let results: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(
            results,
            vec![Err(TransferError::invalid_record(Some(2), "Missing amount"))]
        );
    }

    #[test]
    fn test_sync_reader_reports_physical_line_after_multiline_field() {
        let file = create_temp_csv("from,to,amount\n\"A\nB\",C,1\nA,C,oops\n");

        let results: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(results.len(), 2);
        assert_eq!(
            results[1],
            Err(TransferError::invalid_record(Some(4), "Invalid amount 'oops'"))
        );
    }

    #[test]
    fn test_sync_reader_empty_file_yields_nothing() {
        let file = create_temp_csv("from,to,amount\n");

        assert_eq!(SyncReader::new(file.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_sync_reader_missing_file() {
        let result = SyncReader::new(Path::new("nonexistent.csv"));

        assert!(matches!(result, Err(TransferError::IoError { .. })));
    }
}
