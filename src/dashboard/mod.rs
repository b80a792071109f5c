//! Dashboard module
//!
//! Provides the bank dashboard page: a summary of the filtered transactions,
//! income and expense breakdowns, weekly totals and a comparison of spending
//! against the session's budget.

mod aggregation;
mod charts;
mod handlers;
mod tables;
mod view_model;

pub use handlers::{get_dashboard_page, set_budget_endpoint, update_dashboard};
