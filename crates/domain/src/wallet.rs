// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{Money, UserId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Description of the transaction that opens an account.
pub const OPENING_BALANCE: &str = "opening balance";
/// Description of a ticket purchase debit.
pub const PURCHASE: &str = "purchase";
/// Description of a credit that undoes a failed purchase.
pub const COMPENSATION: &str = "compensation";
/// Description of a cancellation refund.
pub const REFUND: &str = "refund";
/// Description of a debit that undoes a refund whose cancellation was not recorded.
pub const REFUND_REVERSAL: &str = "refund reversal";
/// Description of a wallet top-up.
pub const DEPOSIT: &str = "deposit";

/// One immutable entry in the wallet ledger.
///
/// Replaying every transaction for a user in order reproduces their
/// balance: each `balance` equals the previous balance plus `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletTransaction {
    /// When the transaction was applied.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// The account owner.
    pub user_id: UserId,
    /// Signed delta applied to the balance.
    pub amount: Money,
    /// Balance after applying `amount`.
    pub balance: Money,
    /// What the transaction was for.
    pub description: String,
}
