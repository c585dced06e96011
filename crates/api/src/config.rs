// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use marquee::DEFAULT_STARTING_BALANCE;
use marquee_domain::Money;
use std::path::PathBuf;

/// Data directory used when none is given.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Settings for opening a [`crate::BoxOffice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxOfficeConfig {
    /// Directory holding the CSV data files.
    pub data_dir: PathBuf,
    /// Balance credited to a wallet the first time it is used.
    pub starting_balance: Money,
    /// Whether to read and write the seat snapshot.
    pub use_snapshot: bool,
}

impl BoxOfficeConfig {
    /// Creates a configuration for `data_dir` with the other settings at
    /// their defaults.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}

impl Default for BoxOfficeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            starting_balance: Money::from_units(DEFAULT_STARTING_BALANCE),
            use_snapshot: true,
        }
    }
}
