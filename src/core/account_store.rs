//! Thread-safe account store with an atomic pairwise transfer primitive
//!
//! This module provides the `AccountStore` struct, the sole owner and sole
//! writer of account state.
//!
//! # Design
//!
//! Accounts live in a `DashMap` (a sharded concurrent HashMap) keyed by id.
//! Each entry holds its own `parking_lot::Mutex`, so the map's shard locks are
//! only held long enough to clone an `Arc` out of the entry. Balance changes
//! happen under the per-account mutexes alone.
//!
//! # Locking Discipline
//!
//! A transfer locks both of its accounts before touching either balance. The
//! two mutexes are always acquired in canonical order (lower id first, by
//! byte-wise lexicographic comparison) regardless of which side is debited.
//! Any two transfers sharing an account therefore request their locks in the
//! same relative order, so `A -> B` racing `B -> A` can't form a wait cycle.
//!
//! Guards are RAII, so both locks are released on every exit path, including
//! rejected transfers and lock timeouts.

use crate::types::{Account, AccountId, TransferError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

type AccountSlot = Arc<Mutex<Account>>;

/// In-memory account store
///
/// All methods take `&self` and are safe to call from many threads at once;
/// share the store with `Arc<AccountStore>`.
///
/// # Examples
///
/// ```
/// use rust_transfer_engine::core::AccountStore;
/// use rust_transfer_engine::types::Account;
/// use rust_decimal::Decimal;
///
/// let store = AccountStore::new();
/// store.create_account(Account::new("A", Decimal::new(500, 0))).unwrap();
/// store.create_account(Account::new("B", Decimal::new(400, 0))).unwrap();
///
/// assert!(store.apply_transfer("A", "B", Decimal::new(100, 0)).unwrap());
/// assert_eq!(store.get_account("B").unwrap().balance, Decimal::new(500, 0));
/// ```
#[derive(Debug, Default)]
pub struct AccountStore {
    /// Account slots by id
    accounts: DashMap<AccountId, AccountSlot>,

    /// Upper bound on each lock acquisition inside `apply_transfer`
    ///
    /// `None` waits indefinitely.
    lock_timeout: Option<Duration>,
}

impl AccountStore {
    /// Create an empty store that waits indefinitely for account locks
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            lock_timeout: None,
        }
    }

    /// Create an empty store whose transfers give up after `timeout` per lock
    ///
    /// A transfer that can't acquire one of its locks in time returns
    /// `TransferError::Timeout` with neither balance changed.
    pub fn with_lock_timeout(timeout: Duration) -> Self {
        Self {
            accounts: DashMap::new(),
            lock_timeout: Some(timeout),
        }
    }

    /// The configured lock timeout, if any
    pub fn lock_timeout(&self) -> Option<Duration> {
        self.lock_timeout
    }

    /// Insert a new account
    ///
    /// Insert-if-absent is decided atomically on the map entry, so when
    /// several threads create the same id concurrently exactly one succeeds.
    ///
    /// # Errors
    ///
    /// * `DuplicateAccountId` - an account with this id already exists; it is left untouched
    /// * `NegativeBalance` - the opening balance is below zero
    pub fn create_account(&self, account: Account) -> Result<(), TransferError> {
        if account.balance < Decimal::ZERO {
            return Err(TransferError::negative_balance(&account.id, account.balance));
        }

        match self.accounts.entry(account.id.clone()) {
            Entry::Occupied(_) => Err(TransferError::duplicate_account_id(&account.id)),
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::new(Mutex::new(account)));
                Ok(())
            }
        }
    }

    /// Get a snapshot of an account
    ///
    /// Waits for any in-flight transfer touching this account to finish its
    /// critical section. The lock timeout does not apply here; it bounds
    /// `apply_transfer` only. Returns `None` for unknown ids.
    pub fn get_account(&self, id: &str) -> Option<Account> {
        self.slot(id).map(|slot| slot.lock().clone())
    }

    /// Whether an account with this id exists
    ///
    /// Never takes an account lock, so it can't block behind a transfer.
    pub fn contains_account(&self, id: &str) -> bool {
        self.accounts.contains_key(id)
    }

    /// Atomically move `amount` from `from` to `to`
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - both accounts existed and `from` held at least `amount`
    ///   at the moment of the check; both balances were updated
    /// * `Ok(false)` - an account is missing or funds were insufficient;
    ///   neither balance was changed
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` - `amount` is not greater than zero
    /// * `SameAccount` - `from == to`; rejected before any lock is taken
    /// * `Timeout` - a lock couldn't be acquired within the configured timeout
    /// * `ArithmeticOverflow` - the credit would overflow the decimal range
    ///
    /// No balance is changed on any error path.
    pub fn apply_transfer(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<bool, TransferError> {
        self.apply_transfer_with_snapshots(from, to, amount)
            .map(|applied| applied.is_some())
    }

    /// Same as `apply_transfer`, also returning the debit and credit accounts
    /// as they stood right after the transfer
    ///
    /// The snapshots are taken while both locks are still held, so they show
    /// exactly the state this transfer produced. `None` means not applied.
    pub fn apply_transfer_with_snapshots(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<Option<(Account, Account)>, TransferError> {
        if amount <= Decimal::ZERO {
            return Err(TransferError::invalid_amount(amount));
        }
        if from == to {
            return Err(TransferError::same_account(from));
        }

        // Missing accounts are detected before any lock is taken
        let (Some(debit), Some(credit)) = (self.slot(from), self.slot(to)) else {
            return Ok(None);
        };

        let debit_first = from < to;
        let (first, second) = if debit_first {
            (&debit, &credit)
        } else {
            (&credit, &debit)
        };

        let mut first_guard = self.acquire(first, from, to)?;
        let mut second_guard = self.acquire(second, from, to)?;

        let (debit_account, credit_account) = if debit_first {
            (&mut *first_guard, &mut *second_guard)
        } else {
            (&mut *second_guard, &mut *first_guard)
        };

        if debit_account.balance < amount {
            return Ok(None);
        }

        // Compute both sides before writing either
        let new_debit = debit_account
            .balance
            .checked_sub(amount)
            .ok_or_else(|| TransferError::arithmetic_overflow(from))?;
        let new_credit = credit_account
            .balance
            .checked_add(amount)
            .ok_or_else(|| TransferError::arithmetic_overflow(to))?;

        debit_account.balance = new_debit;
        credit_account.balance = new_credit;

        Ok(Some((debit_account.clone(), credit_account.clone())))
    }

    /// Consistent snapshot of every account, sorted by id
    ///
    /// All accounts are locked in canonical order before any is read, so the
    /// snapshot never contains half of an in-flight transfer.
    pub fn all_accounts(&self) -> Vec<Account> {
        let mut slots: Vec<(AccountId, AccountSlot)> = self
            .accounts
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();
        slots.sort_by(|(a, _), (b, _)| a.cmp(b));

        let guards: Vec<MutexGuard<'_, Account>> =
            slots.iter().map(|(_, slot)| slot.lock()).collect();

        guards.iter().map(|guard| (**guard).clone()).collect()
    }

    /// Sum of all balances taken from a consistent snapshot
    ///
    /// # Errors
    ///
    /// * `ArithmeticOverflow` - the sum leaves the decimal range; carries the
    ///   id of the account whose balance pushed it over
    pub fn total_balance(&self) -> Result<Decimal, TransferError> {
        self.all_accounts()
            .iter()
            .try_fold(Decimal::ZERO, |total, account| {
                total
                    .checked_add(account.balance)
                    .ok_or_else(|| TransferError::arithmetic_overflow(&account.id))
            })
    }

    /// Number of accounts in the store
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the store holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Remove every account
    ///
    /// Support utility for tests and tooling; not part of the transfer path.
    pub fn clear_all(&self) {
        self.accounts.clear();
    }

    /// Clone the slot for `id` out of the map, releasing the shard lock
    pub(super) fn slot(&self, id: &str) -> Option<AccountSlot> {
        self.accounts.get(id).map(|entry| Arc::clone(entry.value()))
    }

    fn acquire<'a>(
        &self,
        slot: &'a AccountSlot,
        from: &str,
        to: &str,
    ) -> Result<MutexGuard<'a, Account>, TransferError> {
        match self.lock_timeout {
            None => Ok(slot.lock()),
            Some(timeout) => slot
                .try_lock_for(timeout)
                .ok_or_else(|| TransferError::timeout(from, to)),
        }
    }
}
