//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use crate::{esg::BenchmarkTables, session::BudgetSessions, transaction::TransactionTable};

/// Settings for the bank dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// The account balance before the first transaction.
    pub initial_balance: f64,

    /// The default weekly budget for each expense category.
    pub default_weekly_budget: f64,

    /// The name shown in the dashboard greeting.
    pub owner_name: String,

    /// How many transactions to show in the recent transactions table.
    pub recent_transaction_count: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            initial_balance: 1000.0,
            default_weekly_budget: crate::budget::DEFAULT_WEEKLY_BUDGET,
            owner_name: "Zeno".to_owned(),
            recent_transaction_count: 10,
        }
    }
}

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The transactions loaded at startup.
    pub transactions: Arc<TransactionTable>,

    /// The budget plan for each browser session.
    pub budget_sessions: BudgetSessions,

    /// The ESG benchmarks for each industry.
    pub benchmarks: Arc<BenchmarkTables>,

    /// Settings for the bank dashboard.
    pub config: Arc<DashboardConfig>,
}

impl AppState {
    /// Create a new [AppState].
    ///
    /// The cookie key is derived from `cookie_secret`. If no secret is given a
    /// random key is generated and sessions will not survive a restart.
    pub fn new(
        cookie_secret: Option<&str>,
        transactions: TransactionTable,
        benchmarks: BenchmarkTables,
        config: DashboardConfig,
    ) -> Self {
        let cookie_key = match cookie_secret {
            Some(secret) => create_cookie_key(secret),
            None => Key::generate(),
        };

        Self {
            cookie_key,
            transactions: Arc::new(transactions),
            budget_sessions: BudgetSessions::new(config.default_weekly_budget),
            benchmarks: Arc::new(benchmarks),
            config: Arc::new(config),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}

#[cfg(test)]
mod tests {
    use super::create_cookie_key;

    #[test]
    fn same_secret_gives_same_key() {
        assert_eq!(
            create_cookie_key("foobar").master(),
            create_cookie_key("foobar").master()
        );
        assert_ne!(
            create_cookie_key("foobar").master(),
            create_cookie_key("barfoo").master()
        );
    }
}
