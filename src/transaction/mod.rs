//! Bank transactions: loading, classification and filtering.

mod classify;
mod domain;
mod filter;
mod loader;

pub use classify::classify;
pub use domain::{AccountRegistry, BankName, Category, Transaction};
pub use filter::{ALL_BANKS, BankFilter, DateRange, TransactionFilter, filter_transactions};
pub use loader::{TransactionTable, load_transaction_table};

#[cfg(test)]
pub use loader::parse_bank_csv;

#[cfg(test)]
pub use domain::test_utils;
