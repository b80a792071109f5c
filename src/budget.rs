//! Weekly budgets for expense categories.
//!
//! A [BudgetPlan] holds one weekly budget per [ExpenseCategory]. Budgets are
//! scaled linearly to the length of the selected date range and compared
//! against the actual expenses in that range.

use std::{collections::BTreeMap, collections::HashMap, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// The number of days a weekly budget covers.
const DAYS_PER_WEEK: f64 = 7.0;

/// The default weekly budget for each category.
pub const DEFAULT_WEEKLY_BUDGET: f64 = 50.0;

/// The known expense categories, matching the expense transaction types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ExpenseCategory {
    Groceries,
    EatingOut,
    Transport,
    Entertainment,
    Education,
    Health,
    Cash,
    Uncategorised,
    FeeAndInterest,
    Other,
}

impl ExpenseCategory {
    /// Every category in display order.
    pub const ALL: [ExpenseCategory; 10] = [
        ExpenseCategory::Groceries,
        ExpenseCategory::EatingOut,
        ExpenseCategory::Transport,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Education,
        ExpenseCategory::Health,
        ExpenseCategory::Cash,
        ExpenseCategory::Uncategorised,
        ExpenseCategory::FeeAndInterest,
        ExpenseCategory::Other,
    ];

    /// The transaction type label for this category.
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Groceries => "Groceries",
            ExpenseCategory::EatingOut => "Eating out",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Education => "Education",
            ExpenseCategory::Health => "Health",
            ExpenseCategory::Cash => "Cash",
            ExpenseCategory::Uncategorised => "Uncategorised",
            ExpenseCategory::FeeAndInterest => "Fee & Interest",
            ExpenseCategory::Other => "Other",
        }
    }
}

impl Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ExpenseCategory {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        ExpenseCategory::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| BudgetError::UnknownCategory(s.to_owned()))
    }
}

/// The reasons a budget cannot be set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BudgetError {
    #[error("select a category to set the budget for")]
    MissingCategory,

    #[error("\"{0}\" is not an expense category")]
    UnknownCategory(String),

    #[error("enter a budget amount")]
    MissingAmount,

    #[error("\"{0}\" is not a valid budget amount")]
    InvalidAmount(String),
}

/// An expense category's budget scaled to a date range, next to the actual
/// expenses in that range.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetComparison {
    pub category: ExpenseCategory,
    pub budget: f64,
    pub actual: f64,
}

/// The weekly budget for every expense category.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetPlan {
    weekly_budgets: BTreeMap<ExpenseCategory, f64>,
}

impl BudgetPlan {
    /// Create a plan with the same weekly budget for every category.
    pub fn new(weekly_budget: f64) -> Self {
        Self {
            weekly_budgets: ExpenseCategory::ALL
                .into_iter()
                .map(|category| (category, weekly_budget))
                .collect(),
        }
    }

    pub fn weekly_budget(&self, category: ExpenseCategory) -> f64 {
        self.weekly_budgets.get(&category).copied().unwrap_or(0.0)
    }

    /// Set the weekly budget for `category`.
    ///
    /// Returns the category that was updated.
    ///
    /// # Errors
    ///
    /// Returns a [BudgetError] if the category is missing or unknown, or the
    /// amount is missing, negative or not finite. The plan is not changed.
    pub fn set_budget(
        &mut self,
        category: Option<&str>,
        amount: Option<f64>,
    ) -> Result<ExpenseCategory, BudgetError> {
        let category = match category.map(str::trim) {
            Some(category) if !category.is_empty() => category.parse::<ExpenseCategory>()?,
            _ => return Err(BudgetError::MissingCategory),
        };

        let amount = amount.ok_or(BudgetError::MissingAmount)?;

        if !amount.is_finite() || amount < 0.0 {
            return Err(BudgetError::InvalidAmount(amount.to_string()));
        }

        self.weekly_budgets.insert(category, amount);

        Ok(category)
    }

    /// The budget for every category scaled from one week to `date_range_days`.
    pub fn adjusted_plan(&self, date_range_days: i64) -> Vec<(ExpenseCategory, f64)> {
        self.weekly_budgets
            .iter()
            .map(|(&category, &weekly_budget)| {
                (
                    category,
                    weekly_budget * date_range_days as f64 / DAYS_PER_WEEK,
                )
            })
            .collect()
    }

    /// Pair every category's adjusted budget with its actual expenses.
    ///
    /// `expense_totals` maps transaction types to total expenses. Categories
    /// without an entry get an actual expense of zero.
    pub fn compare(
        &self,
        date_range_days: i64,
        expense_totals: &HashMap<String, f64>,
    ) -> Vec<BudgetComparison> {
        self.adjusted_plan(date_range_days)
            .into_iter()
            .map(|(category, budget)| BudgetComparison {
                category,
                budget,
                actual: expense_totals
                    .get(category.label())
                    .copied()
                    .unwrap_or(0.0),
            })
            .collect()
    }
}

impl Default for BudgetPlan {
    fn default() -> Self {
        Self::new(DEFAULT_WEEKLY_BUDGET)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{BudgetComparison, BudgetError, BudgetPlan, ExpenseCategory};

    fn get_budget(plan: &[(ExpenseCategory, f64)], category: ExpenseCategory) -> f64 {
        plan.iter()
            .find(|(c, _)| *c == category)
            .map(|(_, budget)| *budget)
            .expect("category missing from plan")
    }

    #[test]
    fn new_plan_has_every_category() {
        let plan = BudgetPlan::new(50.0);

        let adjusted = plan.adjusted_plan(7);

        assert_eq!(adjusted.len(), ExpenseCategory::ALL.len());
        assert!(adjusted.iter().all(|(_, budget)| *budget == 50.0));
    }

    #[test]
    fn set_budget_then_scale() {
        let mut plan = BudgetPlan::default();

        let category = plan.set_budget(Some("Groceries"), Some(70.0));

        assert_eq!(category, Ok(ExpenseCategory::Groceries));
        assert_eq!(
            get_budget(&plan.adjusted_plan(7), ExpenseCategory::Groceries),
            70.0
        );
        assert_eq!(
            get_budget(&plan.adjusted_plan(1), ExpenseCategory::Groceries),
            10.0
        );
    }

    #[test]
    fn scaling_is_linear() {
        let mut plan = BudgetPlan::new(35.0);
        plan.set_budget(Some("Health"), Some(84.0)).unwrap();

        let one_week = plan.adjusted_plan(7);
        let two_weeks = plan.adjusted_plan(14);

        for ((category, weekly), (other_category, fortnightly)) in one_week.iter().zip(&two_weeks) {
            assert_eq!(category, other_category);
            assert_eq!(*fortnightly, 2.0 * weekly, "{category} did not scale linearly");
        }
    }

    #[test]
    fn missing_category_leaves_plan_unchanged() {
        let mut plan = BudgetPlan::default();
        let want = plan.clone();

        assert_eq!(
            plan.set_budget(None, Some(10.0)),
            Err(BudgetError::MissingCategory)
        );
        assert_eq!(
            plan.set_budget(Some("  "), Some(10.0)),
            Err(BudgetError::MissingCategory)
        );
        assert_eq!(plan, want);
    }

    #[test]
    fn missing_amount_leaves_plan_unchanged() {
        let mut plan = BudgetPlan::default();
        let want = plan.clone();

        let result = plan.set_budget(Some("Transport"), None);

        assert_eq!(result, Err(BudgetError::MissingAmount));
        assert_eq!(plan, want);
    }

    #[test]
    fn rejects_unknown_category_and_invalid_amounts() {
        let mut plan = BudgetPlan::default();
        let want = plan.clone();

        assert_eq!(
            plan.set_budget(Some("Salary"), Some(10.0)),
            Err(BudgetError::UnknownCategory("Salary".to_owned()))
        );
        assert!(matches!(
            plan.set_budget(Some("Cash"), Some(-1.0)),
            Err(BudgetError::InvalidAmount(_))
        ));
        assert!(matches!(
            plan.set_budget(Some("Cash"), Some(f64::NAN)),
            Err(BudgetError::InvalidAmount(_))
        ));
        assert_eq!(plan, want);
    }

    #[test]
    fn compare_zero_fills_missing_categories() {
        let plan = BudgetPlan::new(14.0);
        let expense_totals = HashMap::from([
            ("Groceries".to_owned(), 30.0),
            ("Fee & Interest".to_owned(), 2.5),
            ("Salary".to_owned(), 1000.0),
        ]);

        let comparison = plan.compare(14, &expense_totals);

        assert_eq!(comparison.len(), ExpenseCategory::ALL.len());
        assert_eq!(
            comparison[0],
            BudgetComparison {
                category: ExpenseCategory::Groceries,
                budget: 28.0,
                actual: 30.0,
            }
        );
        assert_eq!(
            comparison[1],
            BudgetComparison {
                category: ExpenseCategory::EatingOut,
                budget: 28.0,
                actual: 0.0,
            }
        );
        assert_eq!(comparison[8].category, ExpenseCategory::FeeAndInterest);
        assert_eq!(comparison[8].actual, 2.5);
    }

    #[test]
    fn category_labels_round_trip() {
        for category in ExpenseCategory::ALL {
            assert_eq!(category.label().parse::<ExpenseCategory>(), Ok(category));
        }
    }
}
