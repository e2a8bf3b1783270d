//! Error types for the Rust Transfer Engine
//!
//! This module defines every error kind that can come out of account creation,
//! transfer execution and CSV intake. All of them are expected outcomes the
//! caller is forced to handle; none of them is fatal to the process by itself.
//!
//! # Error Categories
//!
//! - **Account Errors**: duplicate ids, negative opening balances, unknown accounts
//! - **Transfer Errors**: invalid amount, same account, insufficient funds, lock timeout
//! - **Arithmetic Errors**: a credit or balance sum that would overflow the decimal range
//! - **Intake Errors**: I/O failures, malformed CSV, empty account identifiers

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the transfer engine
///
/// Each variant carries the identifiers and amounts needed to report the
/// failure back to whoever submitted the request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransferError {
    /// An account with this id already exists
    ///
    /// The existing account is left untouched.
    #[error("Account id {id} already exists")]
    DuplicateAccountId {
        /// The id that was already taken
        id: String,
    },

    /// An account was created with a balance below zero
    #[error("Account {id} cannot be opened with negative balance {balance}")]
    NegativeBalance {
        /// Account id
        id: String,
        /// Rejected opening balance
        balance: Decimal,
    },

    /// Transfer amount is zero or negative
    #[error("Invalid transfer amount {amount}: amount must be greater than zero")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Source and target of a transfer are the same account
    #[error("Both from and to account cannot be the same: {id}")]
    SameAccount {
        /// The account used on both sides
        id: String,
    },

    /// Account does not exist in the store
    #[error("Account not found: {id}")]
    AccountNotFound {
        /// The id that did not resolve
        id: String,
    },

    /// Debit account could not cover the amount at the moment of the atomic check
    ///
    /// Neither balance was changed.
    #[error("Insufficient funds to transfer {amount} from account {id}")]
    InsufficientFunds {
        /// Debit account id
        id: String,
        /// Requested transfer amount
        amount: Decimal,
    },

    /// Per-account lock could not be acquired within the configured timeout
    ///
    /// Neither balance was changed.
    #[error("Timed out acquiring account locks for transfer {from} -> {to}")]
    Timeout {
        /// Debit account id
        from: String,
        /// Credit account id
        to: String,
    },

    /// A balance computation would overflow the decimal range
    ///
    /// Raised when crediting an account, or when summing balances reaches
    /// this account.
    #[error("Arithmetic overflow on balance of account {id}")]
    ArithmeticOverflow {
        /// Account whose balance overflowed
        id: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// The malformed row is skipped and processing continues.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Row was well-formed CSV but its values are not a valid record
    #[error("Invalid record{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    InvalidRecord {
        /// Line number of the record (if available)
        line: Option<u64>,
        /// What was wrong with it
        message: String,
    },

    /// A required account identifier field was empty
    #[error("Account id field '{field}' cannot be empty")]
    EmptyAccountId {
        /// Name of the empty field ("from", "to" or "account")
        field: String,
    },
}

impl From<std::io::Error> for TransferError {
    fn from(error: std::io::Error) -> Self {
        TransferError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for TransferError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        TransferError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for TransferError {
    fn from(error: csv_async::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        TransferError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl TransferError {
    /// Create a DuplicateAccountId error
    pub fn duplicate_account_id(id: &str) -> Self {
        TransferError::DuplicateAccountId { id: id.to_string() }
    }

    /// Create a NegativeBalance error
    pub fn negative_balance(id: &str, balance: Decimal) -> Self {
        TransferError::NegativeBalance {
            id: id.to_string(),
            balance,
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        TransferError::InvalidAmount { amount }
    }

    /// Create a SameAccount error
    pub fn same_account(id: &str) -> Self {
        TransferError::SameAccount { id: id.to_string() }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(id: &str) -> Self {
        TransferError::AccountNotFound { id: id.to_string() }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(id: &str, amount: Decimal) -> Self {
        TransferError::InsufficientFunds {
            id: id.to_string(),
            amount,
        }
    }

    /// Create a Timeout error
    pub fn timeout(from: &str, to: &str) -> Self {
        TransferError::Timeout {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(id: &str) -> Self {
        TransferError::ArithmeticOverflow { id: id.to_string() }
    }

    /// Create an InvalidRecord error
    pub fn invalid_record(line: Option<u64>, message: impl Into<String>) -> Self {
        TransferError::InvalidRecord {
            line,
            message: message.into(),
        }
    }

    /// Create an EmptyAccountId error
    pub fn empty_account_id(field: &str) -> Self {
        TransferError::EmptyAccountId {
            field: field.to_string(),
        }
    }

    /// Attach a line number to intake errors that don't carry one yet
    pub fn at_line(self, line: u64) -> Self {
        match self {
            TransferError::InvalidRecord { line: None, message } => TransferError::InvalidRecord {
                line: Some(line),
                message,
            },
            TransferError::ParseError { line: None, message } => TransferError::ParseError {
                line: Some(line),
                message,
            },
            other => other,
        }
    }
}
