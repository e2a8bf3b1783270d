//! Account-related types for the Rust Transfer Engine
//!
//! This module defines the Account structure and the account identifier type.

use rust_decimal::Decimal;

/// Account identifier
///
/// Opaque, non-empty string. Ids are totally ordered by their byte-wise
/// lexicographic order, which the store uses as its canonical lock order.
pub type AccountId = String;

/// Account state
///
/// Values of this type handed out by the store are snapshots: mutating one
/// never affects the stored account.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Unique account identifier, immutable after creation
    pub id: AccountId,

    /// Current balance
    ///
    /// Never negative. Only the store's transfer primitive changes it after
    /// the account has been created.
    pub balance: Decimal,
}

impl Account {
    /// Create an account with the given opening balance
    pub fn new(id: impl Into<AccountId>, balance: Decimal) -> Self {
        Account {
            id: id.into(),
            balance,
        }
    }

    /// Create an account with a zero balance
    pub fn empty(id: impl Into<AccountId>) -> Self {
        Self::new(id, Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_account_has_zero_balance() {
        let account = Account::empty("Id-123");

        assert_eq!(account.id, "Id-123");
        assert_eq!(account.balance, Decimal::ZERO);
    }

    #[test]
    fn test_account_ids_order_lexicographically() {
        let mut ids: Vec<AccountId> = vec!["Id-1234".into(), "Id-123".into(), "B".into(), "A".into()];
        ids.sort();

        assert_eq!(ids, vec!["A", "B", "Id-123", "Id-1234"]);
    }
}
