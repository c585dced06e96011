// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-user wallet balances backed by an append-only transaction log.
//!
//! `apply` is the only way a balance changes. Every change is appended to
//! the log before the in-memory balance moves, so replaying the log always
//! reproduces the balances.

use crate::error::{CoreError, StoreError};
use crate::store::TransactionLog;
use marquee_domain::{
    DEPOSIT, DomainError, Money, OPENING_BALANCE, UserId, WalletTransaction,
};
use std::collections::HashMap;
use time::OffsetDateTime;
use tracing::{info, warn};

/// Balance given to an account the first time it is referenced.
pub const DEFAULT_STARTING_BALANCE: i64 = 1000;

/// Wallet balances for every user.
#[derive(Debug)]
pub struct WalletLedger<L: TransactionLog> {
    log: L,
    balances: HashMap<UserId, Money>,
    starting_balance: Money,
}

impl<L: TransactionLog> WalletLedger<L> {
    /// Opens a ledger, rebuilding balances from the log.
    ///
    /// Each user's balance is the sum of their transaction amounts. A stored
    /// running balance that disagrees with the sum is logged and the sum wins.
    ///
    /// # Arguments
    ///
    /// * `log` - The transaction log
    /// * `starting_balance` - Balance for accounts not yet in the log
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read.
    pub fn open(log: L, starting_balance: Money) -> Result<Self, StoreError> {
        let mut balances: HashMap<UserId, Money> = HashMap::new();
        for transaction in log.load_all()? {
            let balance: &mut Money = balances
                .entry(transaction.user_id.clone())
                .or_insert(Money::ZERO);
            *balance = balance
                .checked_add(transaction.amount)
                .map_err(|err| StoreError::Corrupt {
                    location: format!("wallet log for {}", transaction.user_id),
                    reason: err.to_string(),
                })?;
            if *balance != transaction.balance {
                warn!(
                    user_id = %transaction.user_id,
                    recorded = %transaction.balance,
                    replayed = %balance,
                    "Wallet log running balance disagrees with replayed sum"
                );
            }
        }
        info!(accounts = balances.len(), "Wallet ledger opened");
        Ok(Self {
            log,
            balances,
            starting_balance,
        })
    }

    /// Returns the balance new accounts start with.
    #[must_use]
    pub const fn starting_balance(&self) -> Money {
        self.starting_balance
    }

    /// Returns a user's balance, opening the account if it is new.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::PersistenceFailure` if the opening transaction
    /// cannot be written.
    pub fn balance(&mut self, user_id: &UserId) -> Result<Money, CoreError> {
        if let Some(balance) = self.balances.get(user_id) {
            return Ok(*balance);
        }
        let opening: Money = self.starting_balance;
        self.append(user_id, opening, opening, OPENING_BALANCE)?;
        self.balances.insert(user_id.clone(), opening);
        info!(user_id = %user_id, balance = %opening, "Wallet account opened");
        Ok(opening)
    }

    /// Returns a user's balance without opening an account.
    #[must_use]
    pub fn current_balance(&self, user_id: &UserId) -> Money {
        self.balances
            .get(user_id)
            .copied()
            .unwrap_or(self.starting_balance)
    }

    /// Applies a signed change to a user's balance.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The account
    /// * `delta` - Amount to add; negative for a debit
    /// * `description` - What the change is for
    ///
    /// # Returns
    ///
    /// The balance after the change.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InsufficientFunds` if a debit would take the
    /// balance below zero, `CoreError::Domain` if the new balance is out of
    /// range, or `CoreError::PersistenceFailure` if the
    /// transaction cannot be written. The balance is unchanged on error.
    pub fn apply(
        &mut self,
        user_id: &UserId,
        delta: Money,
        description: &str,
    ) -> Result<Money, CoreError> {
        let current: Money = self.balance(user_id)?;
        let updated: Money = current.checked_add(delta)?;
        if delta.is_negative() && updated.is_negative() {
            return Err(CoreError::InsufficientFunds {
                user_id: user_id.clone(),
                balance: current,
                required: -delta,
            });
        }
        self.append(user_id, delta, updated, description)?;
        self.balances.insert(user_id.clone(), updated);
        info!(
            user_id = %user_id,
            amount = %delta,
            balance = %updated,
            description,
            "Wallet transaction applied"
        );
        Ok(updated)
    }

    /// Adds money to a wallet.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if the amount is not positive, or
    /// any error from `apply`.
    pub fn deposit(&mut self, user_id: &UserId, amount: Money) -> Result<Money, CoreError> {
        if !amount.is_positive() {
            return Err(DomainError::InvalidAmount {
                amount: amount.to_string(),
                reason: "deposit must be greater than zero",
            }
            .into());
        }
        self.apply(user_id, amount, DEPOSIT)
    }

    /// Returns a user's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::PersistenceFailure` if the log cannot be read.
    pub fn history(&self, user_id: &UserId) -> Result<Vec<WalletTransaction>, CoreError> {
        let mut transactions: Vec<WalletTransaction> = self
            .log
            .load_all()
            .map_err(CoreError::persistence)?
            .into_iter()
            .filter(|transaction| &transaction.user_id == user_id)
            .collect();
        transactions.reverse();
        Ok(transactions)
    }

    /// Returns the underlying log.
    #[must_use]
    pub const fn log(&self) -> &L {
        &self.log
    }

    fn append(
        &mut self,
        user_id: &UserId,
        amount: Money,
        balance: Money,
        description: &str,
    ) -> Result<(), CoreError> {
        let transaction: WalletTransaction = WalletTransaction {
            timestamp: OffsetDateTime::now_utc(),
            user_id: user_id.clone(),
            amount,
            balance,
            description: description.to_string(),
        };
        self.log
            .append(&transaction)
            .map_err(CoreError::persistence)
    }
}
