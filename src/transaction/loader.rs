//! Loading bank transactions from CSV files.
//!
//! Each bank has its own CSV file with the columns `Transaction Time`,
//! `From Account`, `To Account`, `Amount` and `Transaction Type`. Column names
//! may have surrounding whitespace.

use std::{fs, path::Path};

use serde::Deserialize;
use time::{
    Date, PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{
    Error,
    transaction::{AccountRegistry, BankName, DateRange, Transaction, classify},
};

const TIMESTAMP_FORMATS: [&[BorrowedFormatItem<'static>]; 3] = [
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
];
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A row of a bank's CSV file.
#[derive(Debug, Deserialize)]
struct CsvTransaction {
    #[serde(rename = "Transaction Time")]
    transaction_time: String,
    #[serde(rename = "From Account")]
    from_account: String,
    #[serde(rename = "To Account")]
    to_account: String,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Transaction Type")]
    transaction_type: String,
}

/// A transaction read from a bank's CSV file that has not been classified yet.
#[derive(Debug, Clone, PartialEq)]
pub struct BankRecord {
    pub timestamp: PrimitiveDateTime,
    pub from_account: String,
    pub to_account: String,
    pub amount: f64,
    pub transaction_type: String,
    pub bank: BankName,
}

impl BankRecord {
    /// Classify the record as income or expense.
    ///
    /// # Errors
    ///
    /// Returns [Error::UnknownBank] if the record's bank is not in `registry`.
    pub fn classify(self, registry: &AccountRegistry) -> Result<Transaction, Error> {
        let category = classify(&self.to_account, &self.bank, registry)?;

        Ok(Transaction {
            timestamp: self.timestamp,
            from_account: self.from_account,
            to_account: self.to_account,
            amount: self.amount,
            transaction_type: self.transaction_type,
            bank: self.bank,
            category,
        })
    }
}

/// Parse the CSV data exported for `bank`.
///
/// Records are returned in the order they appear in `text`.
///
/// # Errors
///
/// Returns [Error::InvalidCSV] if a column is missing or a field cannot be
/// parsed, and [Error::InvalidTimestamp] if a transaction time is not in a
/// supported format.
pub fn parse_bank_csv(text: &str, bank: &BankName) -> Result<Vec<BankRecord>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();

    for result in reader.deserialize::<CsvTransaction>() {
        let row = result.map_err(|error| Error::InvalidCSV(format!("{bank}: {error}")))?;
        // The header is line 1 and the reader has already read this record.
        let line = records.len() as u64 + 2;

        let timestamp =
            parse_timestamp(&row.transaction_time).ok_or_else(|| Error::InvalidTimestamp {
                bank: bank.to_string(),
                line,
                value: row.transaction_time.clone(),
            })?;

        records.push(BankRecord {
            timestamp,
            from_account: row.from_account,
            to_account: row.to_account,
            amount: row.amount,
            transaction_type: row.transaction_type,
            bank: bank.clone(),
        });
    }

    Ok(records)
}

fn parse_timestamp(text: &str) -> Option<PrimitiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(text, format).ok())
        .or_else(|| {
            Date::parse(text, DATE_FORMAT)
                .ok()
                .map(|date| date.midnight())
        })
}

/// All classified transactions, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionTable {
    transactions: Vec<Transaction>,
    banks: Vec<BankName>,
}

impl TransactionTable {
    /// Classify `records` with `registry` and build a table.
    ///
    /// # Errors
    ///
    /// Returns [Error::UnknownBank] if any record's bank is not in `registry`.
    pub fn build(
        records: impl IntoIterator<Item = BankRecord>,
        registry: &AccountRegistry,
    ) -> Result<Self, Error> {
        let transactions = records
            .into_iter()
            .map(|record| record.classify(registry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            transactions,
            banks: registry.banks().cloned().collect(),
        })
    }

    /// The classified transactions in the order they were loaded.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The banks that can be selected in the bank filter.
    pub fn banks(&self) -> &[BankName] {
        &self.banks
    }

    /// The dates of the earliest and latest transactions, or `None` if the
    /// table is empty.
    pub fn date_bounds(&self) -> Option<DateRange> {
        let dates = self
            .transactions
            .iter()
            .map(|transaction| transaction.timestamp.date());
        let start = dates.clone().min()?;
        let end = dates.max()?;

        Some(DateRange::new(start, end))
    }
}

/// Load the CSV file for each bank in `registry` from `data_dir`.
///
/// The file for a bank is named after the lowercased bank name, e.g.
/// `commbank_transactions.csv` for "CommBank".
///
/// # Errors
///
/// Returns an error if a file cannot be read or parsed. Startup data must be
/// valid, so there is no partial recovery.
pub fn load_transaction_table(
    data_dir: &Path,
    registry: &AccountRegistry,
) -> Result<TransactionTable, Error> {
    let mut records = Vec::new();

    for bank in registry.banks() {
        let path = data_dir.join(format!(
            "{}_transactions.csv",
            bank.as_ref().to_lowercase()
        ));
        let text = fs::read_to_string(&path)
            .map_err(|error| Error::Io(path.display().to_string(), error.to_string()))?;

        let bank_records = parse_bank_csv(&text, bank)?;
        tracing::info!(
            "Loaded {} transactions for {bank} from {}",
            bank_records.len(),
            path.display()
        );
        records.extend(bank_records);
    }

    TransactionTable::build(records, registry)
}
