//! Transfer validation and orchestration
//!
//! This module provides the `TransferCoordinator` struct, which checks a
//! transfer against the business rules, delegates the balance mutation to the
//! `AccountStore`, and tells both account holders once the money has moved.
//!
//! # Validation Order
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. amount must be greater than zero (`InvalidAmount`)
//! 2. source and target must differ (`SameAccount`)
//! 3. source must exist (`AccountNotFound`)
//! 4. target must exist (`AccountNotFound`)
//!
//! Once the checks pass, a "not applied" answer from the store means the
//! debit side could not cover the amount at the moment of the atomic check,
//! and is surfaced as `InsufficientFunds`.

use std::sync::Arc;

use super::account_store::AccountStore;
use super::notification::Notifier;
use crate::types::{Account, TransferError, TransferRequest};
use rust_decimal::Decimal;

/// Validates transfers and delegates them to the account store
///
/// Cloning is cheap (two `Arc`s); clones share the same store and notifier,
/// so a coordinator can be handed to many threads or tasks.
#[derive(Clone)]
pub struct TransferCoordinator {
    /// Shared account store
    store: Arc<AccountStore>,

    /// Sink for holder notifications
    notifier: Arc<dyn Notifier>,
}

impl TransferCoordinator {
    /// Create a coordinator over `store` that reports to `notifier`
    pub fn new(store: Arc<AccountStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// The store this coordinator transfers against
    pub fn store(&self) -> &Arc<AccountStore> {
        &self.store
    }

    /// Move `amount` from `from` to `to`
    ///
    /// # Returns
    ///
    /// * `Ok(())` - both balances were updated and both holders notified
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` - `amount <= 0`
    /// * `SameAccount` - `from == to`
    /// * `AccountNotFound` - `from` (checked first) or `to` does not exist
    /// * `InsufficientFunds` - the store refused the debit; nothing changed
    /// * `Timeout` / `ArithmeticOverflow` - passed through from the store
    ///
    /// Notification failures are logged and never turn a completed transfer
    /// into an error.
    pub fn transfer(&self, from: &str, to: &str, amount: Decimal) -> Result<(), TransferError> {
        if amount <= Decimal::ZERO {
            return Err(TransferError::invalid_amount(amount));
        }
        if from == to {
            return Err(TransferError::same_account(from));
        }

        // Existence checks take no account lock
        if !self.store.contains_account(from) {
            return Err(TransferError::account_not_found(from));
        }
        if !self.store.contains_account(to) {
            return Err(TransferError::account_not_found(to));
        }

        tracing::debug!(%from, %to, %amount, "transfer initiated");

        let Some((from_account, to_account)) =
            self.store.apply_transfer_with_snapshots(from, to, amount)?
        else {
            return Err(TransferError::insufficient_funds(from, amount));
        };

        self.notify_holders(&from_account, &to_account, amount);

        Ok(())
    }

    /// Execute a parsed transfer request
    pub fn submit(&self, request: &TransferRequest) -> Result<(), TransferError> {
        self.transfer(&request.from, &request.to, request.amount)
    }

    /// Send the debit and credit notices
    ///
    /// `from_account` and `to_account` are the balances this transfer left
    /// behind. The two calls are independent: the credit notice is sent even
    /// if the debit notice failed.
    fn notify_holders(&self, from_account: &Account, to_account: &Account, amount: Decimal) {
        let debit_message = format!(
            "Amount {} has been debited from your account and sent to beneficiary account: {}",
            amount, to_account.id
        );
        let credit_message = format!(
            "Amount {} has been credited to your account. Money transfer from account: {}",
            amount, from_account.id
        );

        for (account, message) in [(from_account, debit_message), (to_account, credit_message)] {
            if let Err(e) = self.notifier.notify(account, &message) {
                tracing::warn!(account = %account.id, "notification dropped: {}", e);
            }
        }
    }
}

impl std::fmt::Debug for TransferCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferCoordinator")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
