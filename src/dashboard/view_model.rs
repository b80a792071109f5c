//! The data shown on the bank dashboard for one set of filters.

use crate::{
    app_state::DashboardConfig,
    budget::{BudgetComparison, BudgetPlan},
    dashboard::aggregation::{
        Summary, WeeklyTotals, group_totals_by_type, most_recent, sorted_breakdown,
        weekly_totals,
    },
    transaction::{Category, Transaction, TransactionFilter, filter_transactions},
};

/// Everything the dashboard displays, computed from the filters and budget.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DashboardView {
    pub filter: TransactionFilter,
    /// The number of days in the filter's date range.
    pub date_range_days: i64,
    pub summary: Summary,
    /// Income per transaction type, largest first.
    pub income_breakdown: Vec<(String, f64)>,
    /// Expenses per transaction type, largest first.
    pub expense_breakdown: Vec<(String, f64)>,
    pub weekly_totals: Vec<WeeklyTotals>,
    pub budget_comparison: Vec<BudgetComparison>,
    /// The most recent transactions, newest first.
    pub recent_transactions: Vec<Transaction>,
}

/// Filter `transactions` and compute the summary, breakdowns, weekly totals
/// and budget comparison for the dashboard.
///
/// An empty selection gives zeroed totals and empty breakdowns.
pub(crate) fn compute_view(
    filter: &TransactionFilter,
    budget_plan: &BudgetPlan,
    transactions: &[Transaction],
    config: &DashboardConfig,
) -> DashboardView {
    let filtered = filter_transactions(transactions, filter);
    let date_range_days = filter.date_range.inclusive_days();

    let income_totals = group_totals_by_type(&filtered, Category::Income);
    let expense_totals = group_totals_by_type(&filtered, Category::Expense);

    DashboardView {
        filter: filter.clone(),
        date_range_days,
        summary: Summary::calculate(&filtered, config.initial_balance),
        income_breakdown: sorted_breakdown(&income_totals),
        expense_breakdown: sorted_breakdown(&expense_totals),
        weekly_totals: weekly_totals(&filtered),
        budget_comparison: budget_plan.compare(date_range_days, &expense_totals),
        recent_transactions: most_recent(&filtered, config.recent_transaction_count)
            .into_iter()
            .cloned()
            .collect(),
    }
}
