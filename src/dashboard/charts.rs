//! Chart generation for the bank dashboard.
//!
//! This module creates the ECharts visualizations for the filtered transactions:
//! - **Income Breakdown**: Pie chart of income grouped by transaction type
//! - **Expense Breakdown**: Pie chart of expenses grouped by transaction type
//! - **Weekly Totals**: Bar chart of income and expenses per week
//! - **Budget vs Actual**: Grouped bar chart of the adjusted budget and actual
//!   expenses per category

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisType, Emphasis, EmphasisFocus, Tooltip, Trigger},
    series::{Bar, Pie},
};
use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    budget::BudgetComparison,
    charts::{ChartView, currency_formatter, currency_tooltip},
    dashboard::{aggregation::WeeklyTotals, view_model::DashboardView},
};

pub(super) const INCOME_CHART_ID: &str = "income-chart";
pub(super) const EXPENSE_CHART_ID: &str = "expense-chart";
pub(super) const WEEKLY_CHART_ID: &str = "weekly-chart";
pub(super) const BUDGET_CHART_ID: &str = "budget-chart";

const WEEK_LABEL_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day] [month repr:short]");

const NO_DATA_SUBTEXT: &str = "No transactions in the selected range";

/// Build every dashboard chart from `view`.
pub(super) fn dashboard_charts(view: &DashboardView) -> [ChartView; 4] {
    [
        ChartView {
            id: INCOME_CHART_ID,
            options: breakdown_chart("Income", "By transaction type", &view.income_breakdown)
                .to_string(),
        },
        ChartView {
            id: EXPENSE_CHART_ID,
            options: breakdown_chart("Expenses", "By transaction type", &view.expense_breakdown)
                .to_string(),
        },
        ChartView {
            id: WEEKLY_CHART_ID,
            options: weekly_chart(&view.weekly_totals).to_string(),
        },
        ChartView {
            id: BUDGET_CHART_ID,
            options: budget_chart(&view.budget_comparison, view.date_range_days).to_string(),
        },
    ]
}

/// A pie chart of amounts grouped by transaction type.
fn breakdown_chart(title: &str, subtext: &str, breakdown: &[(String, f64)]) -> Chart {
    let subtext = if breakdown.is_empty() {
        NO_DATA_SUBTEXT
    } else {
        subtext
    };
    let data: Vec<_> = breakdown
        .iter()
        .map(|(name, amount)| (*amount, name.clone()))
        .collect();

    Chart::new()
        .title(Title::new().text(title).subtext(subtext))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("1%"))
        .series(Pie::new().name(title).radius("60%").data(data))
}

fn weekly_chart(weeks: &[WeeklyTotals]) -> Chart {
    let labels: Vec<String> = weeks
        .iter()
        .map(|week| {
            week.week_start
                .format(WEEK_LABEL_FORMAT)
                .unwrap_or_else(|_| week.week_start.to_string())
        })
        .collect();
    let income: Vec<f64> = weeks.iter().map(|week| week.income).collect();
    let expenses: Vec<f64> = weeks.iter().map(|week| week.expense).collect();
    let subtext = if weeks.is_empty() {
        NO_DATA_SUBTEXT
    } else {
        "Weeks starting Monday"
    };

    Chart::new()
        .title(Title::new().text("Weekly Totals").subtext(subtext))
        .tooltip(currency_tooltip())
        .legend(Legend::new().right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(70)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Bar::new()
                .name("Income")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(income),
        )
        .series(
            Bar::new()
                .name("Expenses")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(expenses),
        )
}

fn budget_chart(comparison: &[BudgetComparison], date_range_days: i64) -> Chart {
    let labels: Vec<String> = comparison
        .iter()
        .map(|row| row.category.label().to_owned())
        .collect();
    let budgets: Vec<f64> = comparison.iter().map(|row| row.budget).collect();
    let actuals: Vec<f64> = comparison.iter().map(|row| row.actual).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Budget vs Actual")
                .subtext(format!("Budget adjusted to {date_range_days} days")),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(70)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Budget").data(budgets))
        .series(Bar::new().name("Actual").data(actuals))
}
