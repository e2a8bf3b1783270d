//! Asynchronous CSV reader with batch interface
//!
//! Provides batch reading of transfer requests from an async byte source,
//! feeding the async processing strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of TransferRequests
//!                  ↓
//!           csv_format module
//!     (TransferCsvRecord, convert_transfer_record)
//! ```

use crate::io::csv_format::{convert_transfer_record, TransferCsvRecord};
use crate::types::{TransferError, TransferRequest};
use csv_async::{AsyncReaderBuilder, Position, StringRecord};
use futures::io::AsyncRead;

/// Asynchronous transfer CSV reader
///
/// Skip warnings name the physical line a record starts on, so quoted fields
/// spanning several lines don't shift later line numbers.
pub struct AsyncReader<R: AsyncRead + Unpin + Send> {
    csv_reader: csv_async::AsyncReader<R>,
    headers: Option<StringRecord>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_reader(reader);

        Self {
            csv_reader,
            headers: None,
        }
    }

    /// Read up to `batch_size` transfer requests
    ///
    /// Rows that fail to parse or convert are logged and skipped; they don't
    /// count towards the batch size. Returns an empty vector at end of input,
    /// or when the header row itself can't be read.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<TransferRequest> {
        let mut batch = Vec::with_capacity(batch_size);

        if self.headers.is_none() {
            match self.csv_reader.headers().await {
                Ok(headers) => self.headers = Some(headers.clone()),
                Err(e) => {
                    tracing::warn!("unreadable transfer header: {}", TransferError::from(e));
                    return batch;
                }
            }
        }

        let mut record = StringRecord::new();
        while batch.len() < batch_size {
            match self.csv_reader.read_record(&mut record).await {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) if e.is_io_error() => {
                    tracing::warn!("stopped reading transfers: {}", TransferError::from(e));
                    break;
                }
                Err(e) => {
                    tracing::warn!("skipping transfer record: {}", TransferError::from(e));
                    continue;
                }
            }

            match convert_record(&record, self.headers.as_ref()) {
                Ok(request) => batch.push(request),
                Err(e) => tracing::warn!("skipping transfer record: {}", e),
            }
        }

        batch
    }
}

/// Convert one raw record, tagging errors with the line the record starts on
fn convert_record(
    record: &StringRecord,
    headers: Option<&StringRecord>,
) -> Result<TransferRequest, TransferError> {
    let result = record
        .deserialize::<TransferCsvRecord>(headers)
        .map_err(TransferError::from)
        .and_then(convert_transfer_record);

    match record.position().map(Position::line) {
        Some(line) => result.map_err(|e| e.at_line(line)),
        None => result,
    }
}
