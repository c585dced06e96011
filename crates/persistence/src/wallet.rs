// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use crate::fields::{format_money, format_timestamp, parse_timestamp};
use crate::table::{Table, TableRow, append_row};
use marquee::{StoreError, TransactionLog};
use marquee_domain::WalletTransaction;
use std::path::{Path, PathBuf};

/// Column order of `wallet_transactions.csv`.
pub const WALLET_HEADER: [&str; 5] = ["Timestamp", "UserID", "Amount", "Balance", "Description"];

/// Wallet transaction log stored as a CSV file.
#[derive(Debug, Clone)]
pub struct CsvTransactionLog {
    path: PathBuf,
}

impl CsvTransactionLog {
    /// Creates a log over `path`. The file is created on first append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file backing the log.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every transaction in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a row does not parse.
    pub fn read(&self) -> Result<Vec<WalletTransaction>, PersistenceError> {
        let table: Table = Table::read(&self.path, &WALLET_HEADER)?;
        table.rows().map(|row| decode(&row)).collect()
    }

    /// Appends one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be written.
    pub fn write(&self, transaction: &WalletTransaction) -> Result<(), PersistenceError> {
        let row: Vec<String> = vec![
            format_timestamp(&self.path, transaction.timestamp)?,
            transaction.user_id.to_string(),
            format_money(transaction.amount),
            format_money(transaction.balance),
            transaction.description.clone(),
        ];
        append_row(&self.path, &WALLET_HEADER, &row)
    }
}

impl TransactionLog for CsvTransactionLog {
    fn append(&mut self, transaction: &WalletTransaction) -> Result<(), StoreError> {
        Ok(self.write(transaction)?)
    }

    fn load_all(&self) -> Result<Vec<WalletTransaction>, StoreError> {
        Ok(self.read()?)
    }
}

fn decode(row: &TableRow<'_>) -> Result<WalletTransaction, PersistenceError> {
    Ok(WalletTransaction {
        timestamp: parse_timestamp(row, "Timestamp")?,
        user_id: row.parse("UserID")?,
        amount: row.parse("Amount")?,
        balance: row.parse("Balance")?,
        description: row.optional("Description").unwrap_or_default().to_string(),
    })
}
