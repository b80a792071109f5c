//! Narrowing transactions down to a date range and bank.

use std::str::FromStr;

use time::Date;

use crate::{
    Error,
    transaction::{BankName, Transaction},
};

/// The form value that selects transactions from every bank.
pub const ALL_BANKS: &str = "all";

/// An inclusive range of dates.
///
/// A range where `start` is after `end` is allowed and contains no dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    /// Whether `date` is on or between the start and end dates.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// The number of days in the range, counting both the start and end date.
    ///
    /// Returns zero if the range is empty.
    pub fn inclusive_days(&self) -> i64 {
        if self.start > self.end {
            0
        } else {
            (self.end - self.start).whole_days() + 1
        }
    }
}

/// Which bank's transactions to include.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BankFilter {
    #[default]
    All,
    Bank(BankName),
}

impl BankFilter {
    fn matches(&self, bank: &BankName) -> bool {
        match self {
            BankFilter::All => true,
            BankFilter::Bank(name) => name == bank,
        }
    }

    /// The value used for this filter in forms.
    pub fn form_value(&self) -> &str {
        match self {
            BankFilter::All => ALL_BANKS,
            BankFilter::Bank(name) => name.as_ref(),
        }
    }
}

impl FromStr for BankFilter {
    type Err = Error;

    /// Parse a bank filter, where [ALL_BANKS] selects every bank.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == ALL_BANKS {
            Ok(BankFilter::All)
        } else {
            BankName::new(s).map(BankFilter::Bank)
        }
    }
}

/// The user's selection of which transactions to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFilter {
    pub date_range: DateRange,
    pub bank: BankFilter,
}

impl TransactionFilter {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.date_range.contains(transaction.timestamp.date())
            && self.bank.matches(&transaction.bank)
    }
}

/// Get the transactions that match `filter`, in their original order.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    filter: &TransactionFilter,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|transaction| filter.matches(transaction))
        .collect()
}
