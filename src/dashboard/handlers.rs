//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for displaying the dashboard, changing the filters and
//!   setting budgets
//! - HTML view functions for rendering the dashboard UI
//! - State and form types used by the handlers

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar};
use maud::{Markup, html};
use serde::Deserialize;
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{
    AppState, Error,
    alert::Alert,
    app_state::DashboardConfig,
    budget::{BudgetError, BudgetPlan, ExpenseCategory},
    charts::{charts_script, charts_view},
    dashboard::{
        charts::dashboard_charts,
        tables::{recent_transactions_table, summary_cards},
        view_model::{DashboardView, compute_view},
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, ECHARTS_SCRIPT, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        HeadElement, PAGE_CONTAINER_STYLE, base, format_currency,
    },
    navigation::NavBar,
    session::{BudgetSessions, get_or_create_session},
    transaction::{ALL_BANKS, BankFilter, DateRange, TransactionFilter, TransactionTable},
};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The transactions loaded at startup.
    pub transactions: Arc<TransactionTable>,
    /// The budget plan for each browser session.
    pub budget_sessions: BudgetSessions,
    /// Settings for the dashboard.
    pub config: Arc<DashboardConfig>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.clone(),
            budget_sessions: state.budget_sessions.clone(),
            config: state.config.clone(),
        }
    }
}

/// The dashboard filters as submitted by the filter form or query string.
///
/// Missing or empty fields fall back to every bank and the full date range of
/// the loaded transactions.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FilterForm {
    pub bank: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl FilterForm {
    /// Validate the form against the banks and dates in `table`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidDate] if a date is not in the format
    /// `YYYY-MM-DD`, and [Error::UnknownBank] if the bank has no transactions.
    fn parse(&self, table: &TransactionTable) -> Result<TransactionFilter, Error> {
        let default_range = default_date_range(table);

        let start = parse_date(self.start_date.as_deref())?.unwrap_or(default_range.start);
        let end = parse_date(self.end_date.as_deref())?.unwrap_or(default_range.end);

        let bank = match non_empty(self.bank.as_deref()) {
            Some(bank) => bank.parse::<BankFilter>()?,
            None => BankFilter::All,
        };

        if let BankFilter::Bank(ref name) = bank
            && !table.banks().contains(name)
        {
            return Err(Error::UnknownBank(name.to_string()));
        }

        Ok(TransactionFilter {
            date_range: DateRange::new(start, end),
            bank,
        })
    }
}

/// The form for setting the weekly budget of a category.
///
/// The current filters are included so the updated dashboard shows the same
/// selection.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BudgetForm {
    pub category: Option<String>,
    pub amount: Option<String>,
    pub bank: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl BudgetForm {
    fn filter_form(&self) -> FilterForm {
        FilterForm {
            bank: self.bank.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_date(text: Option<&str>) -> Result<Option<Date>, Error> {
    non_empty(text)
        .map(|text| {
            Date::parse(text, DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
        })
        .transpose()
}

/// The full date range of `table`, or today if there are no transactions.
fn default_date_range(table: &TransactionTable) -> DateRange {
    table.date_bounds().unwrap_or_else(|| {
        let today = OffsetDateTime::now_utc().date();
        DateRange::new(today, today)
    })
}

/// Display the bank dashboard.
///
/// The filters may be given in the query string, e.g.
/// `/dashboard?bank=ANZ&start_date=2024-09-01&end_date=2024-09-30`.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    jar: PrivateCookieJar,
    Query(form): Query<FilterForm>,
) -> Result<Response, Error> {
    let filter = form.parse(&state.transactions)?;
    let (jar, session_id) = get_or_create_session(jar);
    let budget_plan = state.budget_sessions.get(&session_id)?;

    let view = compute_view(
        &filter,
        &budget_plan,
        state.transactions.transactions(),
        &state.config,
    );

    Ok((jar, dashboard_view(&state, &view, &budget_plan)).into_response())
}

/// Recompute the dashboard with the submitted filters and return the
/// dashboard content.
pub async fn update_dashboard(
    State(state): State<DashboardState>,
    jar: PrivateCookieJar,
    Form(form): Form<FilterForm>,
) -> Response {
    let filter = match form.parse(&state.transactions) {
        Ok(filter) => filter,
        Err(error) => return error.into_alert_response(),
    };
    let (jar, session_id) = get_or_create_session(jar);
    let budget_plan = match state.budget_sessions.get(&session_id) {
        Ok(plan) => plan,
        Err(error) => return error.into_alert_response(),
    };

    let view = compute_view(
        &filter,
        &budget_plan,
        state.transactions.transactions(),
        &state.config,
    );

    (jar, dashboard_content(&view, &budget_plan, None)).into_response()
}

/// Set the weekly budget for a category in the session's plan and return the
/// dashboard content with an alert saying whether it worked.
///
/// An invalid budget leaves the plan unchanged and is not an HTTP error, the
/// dashboard is still shown with an error alert.
pub async fn set_budget_endpoint(
    State(state): State<DashboardState>,
    jar: PrivateCookieJar,
    Form(form): Form<BudgetForm>,
) -> Response {
    let filter = match form.filter_form().parse(&state.transactions) {
        Ok(filter) => filter,
        Err(error) => return error.into_alert_response(),
    };
    let (jar, session_id) = get_or_create_session(jar);

    let amount = match non_empty(form.amount.as_deref()) {
        Some(text) => match text.parse::<f64>() {
            Ok(amount) => Ok(Some(amount)),
            Err(_) => Err(BudgetError::InvalidAmount(text.to_owned())),
        },
        None => Ok(None),
    };

    let update = state.budget_sessions.update(&session_id, |plan| {
        plan.set_budget(form.category.as_deref(), amount?)
            .map(|category| (category, plan.weekly_budget(category)))
    });

    let (budget_plan, result) = match update {
        Ok(update) => update,
        Err(error) => return error.into_alert_response(),
    };

    let alert = match result {
        Ok((category, weekly_budget)) => {
            tracing::info!("Session {session_id} set the {category} budget to {weekly_budget}");
            Alert::success(
                "Budget updated",
                &format!(
                    "The weekly budget for {category} is now {}.",
                    format_currency(weekly_budget)
                ),
            )
        }
        Err(error) => {
            tracing::warn!("Session {session_id} could not set a budget: {error}");
            Alert::error("Could not set budget", &error.to_string())
        }
    };

    let view = compute_view(
        &filter,
        &budget_plan,
        state.transactions.transactions(),
        &state.config,
    );

    (jar, dashboard_content(&view, &budget_plan, Some(alert))).into_response()
}

/// Renders the full dashboard page.
fn dashboard_view(
    state: &DashboardState,
    view: &DashboardView,
    budget_plan: &BudgetPlan,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let bounds = default_date_range(&state.transactions);

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            header class="w-full mb-4"
            {
                h1 class="text-2xl font-bold" { "Welcome back, " (state.config.owner_name) }
                p class="text-gray-600 dark:text-gray-400"
                {
                    "Here is how your money moved between "
                    (bounds.start) " and " (bounds.end) "."
                }
            }

            (filter_form(state, view, bounds))

            div id="dashboard-content" class="w-full"
            {
                (dashboard_content(view, budget_plan, None))
            }
        }
    );

    let scripts = [HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned())];

    base("Dashboard", &scripts, &content)
}

/// Renders the dashboard content that is replaced when the filters or budget
/// change.
///
/// The budget form is part of the content so its current budgets are
/// refreshed along with the budget chart.
fn dashboard_content(
    view: &DashboardView,
    budget_plan: &BudgetPlan,
    alert: Option<Alert>,
) -> Markup {
    let charts = dashboard_charts(view);

    html!(
        @if let Some(alert) = alert {
            div id="budget-status" class="w-full" { (alert.into_html()) }
        }

        p id="date-range-days" class="w-full mb-2 text-sm text-gray-600 dark:text-gray-400"
        {
            "Showing " (view.date_range_days) " days from "
            (view.filter.date_range.start) " to " (view.filter.date_range.end) "."
        }

        (summary_cards(&view.summary))

        section id="charts" class="w-full mx-auto mb-4"
        {
            (charts_view(&charts))
        }

        (recent_transactions_table(&view.recent_transactions))

        (budget_form(budget_plan))

        (charts_script(&charts))
    )
}

fn filter_form(state: &DashboardState, view: &DashboardView, bounds: DateRange) -> Markup {
    let selected_bank = view.filter.bank.form_value();

    html!(
        form
            id="filter-form"
            hx-post=(endpoints::DASHBOARD_API)
            hx-target="#dashboard-content"
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
            hx-trigger="change"
            class="w-full grid grid-cols-1 md:grid-cols-3 gap-4 mb-4 p-4 rounded-lg bg-gray-100 dark:bg-gray-800"
        {
            div
            {
                label for="bank" class=(FORM_LABEL_STYLE) { "Bank" }
                select id="bank" name="bank" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value=(ALL_BANKS) selected[selected_bank == ALL_BANKS] { "All banks" }

                    @for bank in state.transactions.banks() {
                        option
                            value=(bank)
                            selected[selected_bank == bank.as_ref()]
                        {
                            (bank)
                        }
                    }
                }
            }

            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "Start date" }
                input
                    type="date"
                    id="start_date"
                    name="start_date"
                    value=(view.filter.date_range.start)
                    min=(bounds.start)
                    max=(bounds.end)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "End date" }
                input
                    type="date"
                    id="end_date"
                    name="end_date"
                    value=(view.filter.date_range.end)
                    min=(bounds.start)
                    max=(bounds.end)
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    )
}

fn budget_form(budget_plan: &BudgetPlan) -> Markup {
    html!(
        section class="w-full mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Set Weekly Budget" }

            form
                id="budget-form"
                hx-post=(endpoints::BUDGET_API)
                hx-include="#filter-form"
                hx-target="#dashboard-content"
                hx-target-error="#alert-container"
                hx-swap="innerHTML"
                class="grid grid-cols-1 md:grid-cols-3 gap-4 p-4 rounded-lg bg-gray-100 dark:bg-gray-800"
            {
                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                    select id="category" name="category" required class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for category in ExpenseCategory::ALL {
                            option value=(category)
                            {
                                (category) " (currently "
                                (format_currency(budget_plan.weekly_budget(category)))
                                ")"
                            }
                        }
                    }
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Weekly budget" }
                    input
                        type="number"
                        id="amount"
                        name="amount"
                        min="0"
                        step="0.01"
                        placeholder="50.00"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="flex items-end"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Set Budget" }
                }
            }
        }
    )
}
