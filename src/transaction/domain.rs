//! Core transaction domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::Error;

/// A validated, non-empty bank name, e.g. "CommBank".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash, PartialOrd, Ord)]
pub struct BankName(String);

impl BankName {
    /// Create a bank name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyBankName] if `name` is empty
    /// or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyBankName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a bank name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for BankName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for BankName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BankName::new(s)
    }
}

impl Display for BankName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether money came into or went out of the owner's accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Income,
    Expense,
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Income => write!(f, "income"),
            Category::Expense => write!(f, "expense"),
        }
    }
}

/// A classified bank transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub timestamp: PrimitiveDateTime,
    pub from_account: String,
    pub to_account: String,
    /// The amount of money moved. Positive for both income and expenses,
    /// the direction is given by `category`.
    pub amount: f64,
    /// The label for the kind of transaction, e.g. "Salary" or "Groceries".
    pub transaction_type: String,
    pub bank: BankName,
    pub category: Category,
}

/// The owner's own account identifier at each bank.
///
/// Banks are kept in insertion order, which is also the order their data is
/// loaded and listed in.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountRegistry {
    accounts: Vec<(BankName, String)>,
}

impl AccountRegistry {
    /// Create a registry from `(bank, self account)` pairs.
    ///
    /// If a bank appears more than once, the last account wins.
    pub fn new(accounts: impl IntoIterator<Item = (BankName, String)>) -> Self {
        let mut registry = Self {
            accounts: Vec::new(),
        };

        for (bank, account) in accounts {
            match registry.accounts.iter_mut().find(|(name, _)| *name == bank) {
                Some(entry) => entry.1 = account,
                None => registry.accounts.push((bank, account)),
            }
        }

        registry
    }

    /// Get the owner's account at `bank`.
    ///
    /// # Errors
    ///
    /// Returns [Error::UnknownBank] if `bank` is not in the registry.
    pub fn self_account(&self, bank: &BankName) -> Result<&str, Error> {
        self.accounts
            .iter()
            .find(|(name, _)| name == bank)
            .map(|(_, account)| account.as_str())
            .ok_or_else(|| Error::UnknownBank(bank.to_string()))
    }

    /// The registered banks in insertion order.
    pub fn banks(&self) -> impl Iterator<Item = &BankName> {
        self.accounts.iter().map(|(bank, _)| bank)
    }
}

impl Default for AccountRegistry {
    fn default() -> Self {
        Self::new([
            (BankName::new_unchecked("CommBank"), "111111-0000".to_owned()),
            (BankName::new_unchecked("ANZ"), "222222-0000".to_owned()),
            (BankName::new_unchecked("BOC"), "333333-0000".to_owned()),
        ])
    }
}
