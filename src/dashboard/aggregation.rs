//! Transaction data aggregation for the dashboard summary, charts and tables.
//!
//! All functions take the transactions that passed the dashboard filter and
//! return plain data, the views decide how to display it.

use std::collections::{BTreeMap, HashMap};

use time::{Date, Duration};

use crate::transaction::{Category, Transaction};

/// The headline numbers for the filtered transactions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Summary {
    pub balance: f64,
    pub total_income: f64,
    pub total_expense: f64,
}

impl Summary {
    /// Sum income and expenses, and apply them to `initial_balance`.
    pub fn calculate(transactions: &[&Transaction], initial_balance: f64) -> Self {
        let mut total_income = 0.0;
        let mut total_expense = 0.0;

        for transaction in transactions {
            match transaction.category {
                Category::Income => total_income += transaction.amount,
                Category::Expense => total_expense += transaction.amount,
            }
        }

        Self {
            balance: initial_balance + total_income - total_expense,
            total_income,
            total_expense,
        }
    }
}

/// Sum the amounts of the transactions in `category` by transaction type.
///
/// Transaction types without any matching transactions are not in the map.
pub(crate) fn group_totals_by_type(
    transactions: &[&Transaction],
    category: Category,
) -> HashMap<String, f64> {
    let mut totals = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.category == category)
    {
        *totals
            .entry(transaction.transaction_type.clone())
            .or_insert(0.0) += transaction.amount;
    }

    totals
}

/// Sort group totals from largest to smallest, breaking ties by name.
pub(crate) fn sorted_breakdown(totals: &HashMap<String, f64>) -> Vec<(String, f64)> {
    let mut breakdown: Vec<_> = totals
        .iter()
        .map(|(name, amount)| (name.clone(), *amount))
        .collect();
    breakdown.sort_by(|(a_name, a), (b_name, b)| b.total_cmp(a).then_with(|| a_name.cmp(b_name)));
    breakdown
}

/// Income and expense totals for one week.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WeeklyTotals {
    /// The Monday the week starts on.
    pub week_start: Date,
    pub income: f64,
    /// The total expenses as a positive number.
    pub expense: f64,
}

/// Get the Monday on or before `date`.
fn week_start(date: Date) -> Date {
    date - Duration::days(i64::from(date.weekday().number_days_from_monday()))
}

/// Total income and expenses for each week, in chronological order.
///
/// Weeks without any transactions are left out.
pub(crate) fn weekly_totals(transactions: &[&Transaction]) -> Vec<WeeklyTotals> {
    let mut weeks: BTreeMap<Date, WeeklyTotals> = BTreeMap::new();

    for transaction in transactions {
        let start = week_start(transaction.timestamp.date());
        let totals = weeks.entry(start).or_insert(WeeklyTotals {
            week_start: start,
            income: 0.0,
            expense: 0.0,
        });

        match transaction.category {
            Category::Income => totals.income += transaction.amount,
            Category::Expense => totals.expense += transaction.amount.abs(),
        }
    }

    weeks.into_values().collect()
}

/// The `count` most recent transactions, newest first.
pub(crate) fn most_recent<'a>(
    transactions: &[&'a Transaction],
    count: usize,
) -> Vec<&'a Transaction> {
    let mut recent = transactions.to_vec();
    recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    recent.truncate(count);
    recent
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use time::macros::{date, datetime};

    use crate::transaction::{Category, Transaction, test_utils::make_transaction};

    use super::{
        Summary, WeeklyTotals, group_totals_by_type, most_recent, sorted_breakdown,
        weekly_totals,
    };

    fn get_test_transactions() -> Vec<Transaction> {
        vec![
            // Sunday
            make_transaction(
                datetime!(2024-09-01 09:00),
                200.0,
                "Salary",
                "CommBank",
                Category::Income,
            ),
            // Monday
            make_transaction(
                datetime!(2024-09-02 10:00),
                50.0,
                "Groceries",
                "ANZ",
                Category::Expense,
            ),
            make_transaction(
                datetime!(2024-09-04 18:30),
                30.0,
                "Groceries",
                "CommBank",
                Category::Expense,
            ),
            // Sunday
            make_transaction(
                datetime!(2024-09-08 12:00),
                25.5,
                "Refund",
                "BOC",
                Category::Income,
            ),
        ]
    }

    #[test]
    fn summary_of_nothing_is_initial_balance() {
        let summary = Summary::calculate(&[], 1000.0);

        assert_eq!(
            summary,
            Summary {
                balance: 1000.0,
                total_income: 0.0,
                total_expense: 0.0
            }
        );
    }

    #[test]
    fn summary_applies_income_and_expenses() {
        let income = make_transaction(
            datetime!(2024-09-01 09:00),
            200.0,
            "Salary",
            "CommBank",
            Category::Income,
        );
        let expense = make_transaction(
            datetime!(2024-09-02 09:00),
            80.0,
            "Groceries",
            "CommBank",
            Category::Expense,
        );

        let summary = Summary::calculate(&[&income, &expense], 1000.0);

        assert_eq!(summary.balance, 1120.0);
        assert_eq!(summary.total_income, 200.0);
        assert_eq!(summary.total_expense, 80.0);
    }

    #[test]
    fn groups_by_transaction_type() {
        let transactions = get_test_transactions();
        let transactions: Vec<_> = transactions.iter().collect();

        let expenses = group_totals_by_type(&transactions, Category::Expense);
        let income = group_totals_by_type(&transactions, Category::Income);

        assert_eq!(expenses, HashMap::from([("Groceries".to_owned(), 80.0)]));
        assert_eq!(
            income,
            HashMap::from([("Salary".to_owned(), 200.0), ("Refund".to_owned(), 25.5)])
        );
    }

    #[test]
    fn breakdown_is_sorted_largest_first() {
        let totals = HashMap::from([
            ("Transport".to_owned(), 10.0),
            ("Groceries".to_owned(), 80.0),
            ("Cash".to_owned(), 10.0),
        ]);

        let breakdown = sorted_breakdown(&totals);

        assert_eq!(
            breakdown,
            vec![
                ("Groceries".to_owned(), 80.0),
                ("Cash".to_owned(), 10.0),
                ("Transport".to_owned(), 10.0),
            ]
        );
    }

    #[test]
    fn weeks_start_on_monday() {
        let transactions = get_test_transactions();
        let transactions: Vec<_> = transactions.iter().collect();

        let weeks = weekly_totals(&transactions);

        assert_eq!(
            weeks,
            vec![
                WeeklyTotals {
                    week_start: date!(2024 - 08 - 26),
                    income: 200.0,
                    expense: 0.0,
                },
                WeeklyTotals {
                    week_start: date!(2024 - 09 - 02),
                    income: 25.5,
                    expense: 80.0,
                },
            ]
        );
    }

    #[test]
    fn weekly_totals_of_nothing_is_empty() {
        assert!(weekly_totals(&[]).is_empty());
    }

    #[test]
    fn most_recent_is_newest_first() {
        let transactions = get_test_transactions();
        let transactions: Vec<_> = transactions.iter().collect();

        let recent = most_recent(&transactions, 2);

        assert_eq!(recent, vec![transactions[3], transactions[2]]);
        assert_eq!(most_recent(&transactions, 10).len(), 4);
    }
}
