//! Alerts for displaying success, error and informational messages to users.

use maud::{Markup, html};

/// Alert message types for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    Success,
    Error,
    Info,
}

/// A message shown to the user, optionally with extra details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub alert_type: AlertType,
    pub message: String,
    pub details: String,
}

impl Alert {
    /// Create a new success alert.
    pub fn success(message: &str, details: &str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create a new error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create a new informational alert.
    pub fn info(message: &str, details: &str) -> Self {
        Self {
            alert_type: AlertType::Info,
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    pub fn into_html(self) -> Markup {
        let style = match self.alert_type {
            AlertType::Success => {
                "text-green-800 bg-green-50 border-green-300 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
            }
            AlertType::Error => {
                "text-red-800 bg-red-50 border-red-300 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
            }
            AlertType::Info => {
                "text-blue-800 bg-blue-50 border-blue-300 \
                dark:bg-gray-800 dark:text-blue-400 dark:border-blue-800"
            }
        };
        let role = match self.alert_type {
            AlertType::Error => "alert",
            AlertType::Success | AlertType::Info => "status",
        };

        html!(
            div
                role=(role)
                data-alert-type=(format!("{:?}", self.alert_type).to_lowercase())
                class={ "p-4 mb-4 text-sm border rounded-lg " (style) }
            {
                p class="font-medium" { (self.message) }

                @if !self.details.is_empty() {
                    p class="mt-1" { (self.details) }
                }
            }
        )
    }
}
