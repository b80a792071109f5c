//! Budget Dash is a web app with two small dashboards:
//!
//! - a bank dashboard that summarises transactions from several banks, breaks
//!   income and expenses down by type, and compares spending against a weekly
//!   budget,
//! - an ESG dashboard that compares a company's indicators against industry
//!   benchmarks.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod budget;
mod charts;
mod dashboard;
mod endpoints;
mod esg;
mod html;
mod navigation;
mod not_found;
mod routing;
mod session;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, DashboardConfig};
pub use esg::BenchmarkTables;
pub use routing::build_router;
pub use transaction::{AccountRegistry, BankName, TransactionTable, load_transaction_table};

use crate::{alert::Alert, html::error_view, not_found::get_404_not_found_response};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A data file could not be read.
    ///
    /// Callers should pass in the file path and the original error as a string.
    #[error("could not read \"{0}\": {1}")]
    Io(String, String),

    /// The CSV had issues that prevented it from being parsed, e.g. a missing
    /// column or an amount that is not a number.
    #[error("could not parse the CSV data: {0}")]
    InvalidCSV(String),

    /// A transaction timestamp in the CSV data could not be parsed.
    #[error("could not parse \"{value}\" as a timestamp on line {line} of the {bank} data")]
    InvalidTimestamp {
        /// The bank the data was loaded for.
        bank: String,
        /// The line in the CSV file, counting the header as line 1.
        line: u64,
        /// The text that could not be parsed.
        value: String,
    },

    /// An empty string was used as a bank name.
    #[error("bank name cannot be empty")]
    EmptyBankName,

    /// There is no self account registered for the bank.
    ///
    /// This is a configuration error: every bank that transactions are loaded
    /// for must be in the account registry.
    #[error("no self account is registered for the bank \"{0}\"")]
    UnknownBank(String),

    /// A date in a request could not be parsed.
    #[error("could not parse \"{0}\" as a date")]
    InvalidDate(String),

    /// The industry in a request is not one of the known industries.
    #[error("unknown industry \"{0}\"")]
    UnknownIndustry(String),

    /// The multipart form could not be parsed.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// Could not acquire the lock on the budget sessions.
    #[error("could not acquire the session lock")]
    SessionLockError,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidDate(_) | Error::UnknownBank(_) | Error::EmptyBankName => (
                StatusCode::BAD_REQUEST,
                error_view(
                    "Bad Request",
                    "400",
                    "Invalid filter",
                    &self.to_string(),
                ),
            )
                .into_response(),
            Error::UnknownIndustry(_) => get_404_not_found_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_view(
                        "Internal Server Error",
                        "500",
                        "Sorry, something went wrong.",
                        "Try again later or check the server logs",
                    ),
                )
                    .into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert for htmx requests.
    ///
    /// The response status code is not 2xx, so htmx swaps the alert into the
    /// element named by the form's `hx-target-error` attribute.
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidDate(date) => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid date",
                    &format!("Could not parse \"{date}\" as a date, use the format YYYY-MM-DD."),
                )
                .into_html(),
            )
                .into_response(),
            Error::UnknownBank(bank) => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Unknown bank",
                    &format!("There is no data for the bank \"{bank}\"."),
                )
                .into_html(),
            )
                .into_response(),
            Error::UnknownIndustry(industry) => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Unknown industry",
                    &format!("There are no benchmarks for the industry \"{industry}\"."),
                )
                .into_html(),
            )
                .into_response(),
            Error::MultipartError(error) => (
                StatusCode::BAD_REQUEST,
                Alert::error("Could not read the submitted form", &error).into_html(),
            )
                .into_response(),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::error(
                        "Something went wrong",
                        "An unexpected error occurred, check the server logs for more details.",
                    )
                    .into_html(),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn invalid_filters_are_bad_requests() {
        let response = Error::InvalidDate("2024-13-01".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = Error::UnknownBank("Kiwibank".to_owned()).into_alert_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn lock_error_is_internal_server_error() {
        let response = Error::SessionLockError.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = Error::SessionLockError.into_alert_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
