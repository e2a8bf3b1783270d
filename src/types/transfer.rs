//! Transfer-related types for the Rust Transfer Engine

use super::account::AccountId;
use rust_decimal::Decimal;

/// A request to move `amount` from one account to another
///
/// Ephemeral: requests are validated and executed, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    /// Debit account
    pub from: AccountId,

    /// Credit account
    pub to: AccountId,

    /// Amount to move; must be greater than zero to be accepted
    pub amount: Decimal,
}

impl TransferRequest {
    pub fn new(from: impl Into<AccountId>, to: impl Into<AccountId>, amount: Decimal) -> Self {
        TransferRequest {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}
