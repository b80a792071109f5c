//! Per-browser budget plans.
//!
//! Each browser gets a random session ID in a private cookie. The budget plan
//! for that session lives in memory in [BudgetSessions] and is lost when the
//! server restarts.

use std::{
    collections::HashMap,
    fmt::Display,
    sync::{Arc, Mutex},
};

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};

use crate::{Error, budget::BudgetPlan};

pub(crate) const COOKIE_SESSION_ID: &str = "session_id";

/// An opaque identifier for a browser session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    fn generate() -> Self {
        Self(format!("{:032x}", rand::random::<u128>()))
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Get the session ID from the cookie jar, or start a new session.
///
/// Returns the jar, with the session cookie added if it was missing, and the
/// session ID. The jar must be returned in the response for a new session to
/// stick.
pub(crate) fn get_or_create_session(jar: PrivateCookieJar) -> (PrivateCookieJar, SessionId) {
    if let Some(cookie) = jar.get(COOKIE_SESSION_ID) {
        let session_id = SessionId(cookie.value().to_owned());
        return (jar, session_id);
    }

    let session_id = SessionId::generate();
    tracing::debug!("Starting new session {session_id}");

    let jar = jar.add(
        Cookie::build((COOKIE_SESSION_ID, session_id.0.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict),
    );

    (jar, session_id)
}

/// The most sessions kept in memory before the least recently used is dropped.
pub(crate) const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// A stored plan and when its session last used it.
#[derive(Debug)]
struct StoredPlan {
    plan: BudgetPlan,
    last_used: u64,
}

#[derive(Debug, Default)]
struct SessionStore {
    plans: HashMap<SessionId, StoredPlan>,
    /// Incremented on every access, so a larger value is more recent.
    clock: u64,
}

impl SessionStore {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Drop the least recently used plan.
    fn evict_oldest(&mut self) {
        let oldest = self
            .plans
            .iter()
            .min_by_key(|(_, stored)| stored.last_used)
            .map(|(session_id, _)| session_id.clone());

        if let Some(session_id) = oldest {
            tracing::debug!("Dropping the budget plan for idle session {session_id}");
            self.plans.remove(&session_id);
        }
    }
}

/// The budget plan for each session.
///
/// Sessions that have not set a budget get a plan with the default weekly
/// budget for every category. At most `max_sessions` plans are kept; when a
/// new session stores a plan beyond that, the least recently used plan is
/// dropped and that session falls back to the defaults.
#[derive(Debug, Clone)]
pub struct BudgetSessions {
    store: Arc<Mutex<SessionStore>>,
    default_weekly_budget: f64,
    max_sessions: usize,
}

impl BudgetSessions {
    pub fn new(default_weekly_budget: f64) -> Self {
        Self::with_max_sessions(default_weekly_budget, DEFAULT_MAX_SESSIONS)
    }

    /// Create a store that keeps at most `max_sessions` plans (at least one).
    pub fn with_max_sessions(default_weekly_budget: f64, max_sessions: usize) -> Self {
        Self {
            store: Arc::new(Mutex::new(SessionStore::default())),
            default_weekly_budget,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Get a copy of the budget plan for `session_id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::SessionLockError] if the lock is poisoned.
    pub fn get(&self, session_id: &SessionId) -> Result<BudgetPlan, Error> {
        let mut store = self.store.lock().map_err(|_| Error::SessionLockError)?;
        let now = store.tick();

        Ok(match store.plans.get_mut(session_id) {
            Some(stored) => {
                stored.last_used = now;
                stored.plan.clone()
            }
            None => BudgetPlan::new(self.default_weekly_budget),
        })
    }

    /// Run `update` on the budget plan for `session_id` and return a copy of
    /// the plan along with the result of `update`.
    ///
    /// A new session's plan is only stored when `update` succeeds.
    ///
    /// # Errors
    ///
    /// Returns [Error::SessionLockError] if the lock is poisoned.
    pub fn update<T, E>(
        &self,
        session_id: &SessionId,
        update: impl FnOnce(&mut BudgetPlan) -> Result<T, E>,
    ) -> Result<(BudgetPlan, Result<T, E>), Error> {
        let mut store = self.store.lock().map_err(|_| Error::SessionLockError)?;
        let now = store.tick();

        let mut plan = store
            .plans
            .get(session_id)
            .map(|stored| stored.plan.clone())
            .unwrap_or_else(|| BudgetPlan::new(self.default_weekly_budget));
        let result = update(&mut plan);

        if result.is_ok() {
            if !store.plans.contains_key(session_id) && store.plans.len() >= self.max_sessions {
                store.evict_oldest();
            }

            store.plans.insert(
                session_id.clone(),
                StoredPlan {
                    plan: plan.clone(),
                    last_used: now,
                },
            );
        }

        Ok((plan, result))
    }

    /// The number of sessions with a stored plan.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.store.lock().map(|store| store.plans.len()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};

    use crate::budget::{BudgetError, BudgetPlan, ExpenseCategory};

    use super::{BudgetSessions, COOKIE_SESSION_ID, SessionId, get_or_create_session};

    #[test]
    fn new_session_gets_default_plan() {
        let sessions = BudgetSessions::new(25.0);

        let plan = sessions.get(&SessionId::generate()).unwrap();

        assert_eq!(plan, BudgetPlan::new(25.0));
    }

    #[test]
    fn update_only_changes_own_session() {
        let sessions = BudgetSessions::new(50.0);
        let alice = SessionId::generate();
        let bob = SessionId::generate();

        let (plan, result) = sessions
            .update(&alice, |plan| plan.set_budget(Some("Groceries"), Some(70.0)))
            .unwrap();

        assert_eq!(result, Ok(ExpenseCategory::Groceries));
        assert_eq!(plan.weekly_budget(ExpenseCategory::Groceries), 70.0);
        assert_eq!(
            sessions
                .get(&alice)
                .unwrap()
                .weekly_budget(ExpenseCategory::Groceries),
            70.0
        );
        assert_eq!(
            sessions
                .get(&bob)
                .unwrap()
                .weekly_budget(ExpenseCategory::Groceries),
            50.0
        );
    }

    #[test]
    fn failed_update_keeps_plan() {
        let sessions = BudgetSessions::new(50.0);
        let session_id = SessionId::generate();

        let (plan, result) = sessions
            .update(&session_id, |plan| plan.set_budget(Some("Groceries"), None))
            .unwrap();

        assert_eq!(result, Err(BudgetError::MissingAmount));
        assert_eq!(plan, BudgetPlan::new(50.0));
        assert_eq!(sessions.get(&session_id).unwrap(), BudgetPlan::new(50.0));
    }

    #[test]
    fn creates_session_cookie_once() {
        let jar = PrivateCookieJar::new(Key::generate());

        let (jar, session_id) = get_or_create_session(jar);
        let cookie = jar.get(COOKIE_SESSION_ID).expect("session cookie missing");
        assert_eq!(cookie.value(), session_id.to_string());

        let (_, same_session_id) = get_or_create_session(jar);
        assert_eq!(same_session_id, session_id);
    }

    #[test]
    fn stored_plans_are_bounded() {
        let sessions = BudgetSessions::with_max_sessions(50.0, 100);

        for _ in 0..1_000 {
            let jar = PrivateCookieJar::new(Key::generate());
            let (_, session_id) = get_or_create_session(jar);

            let (_, result) = sessions
                .update(&session_id, |plan| plan.set_budget(Some("Cash"), Some(10.0)))
                .unwrap();
            assert!(result.is_ok());
        }

        assert_eq!(sessions.len(), 100);
    }

    #[test]
    fn least_recently_used_plan_is_dropped_first() {
        let sessions = BudgetSessions::with_max_sessions(50.0, 2);
        let first = SessionId::generate();
        let second = SessionId::generate();
        let third = SessionId::generate();
        let set_groceries =
            |plan: &mut BudgetPlan| plan.set_budget(Some("Groceries"), Some(70.0));

        sessions.update(&first, set_groceries).unwrap();
        sessions.update(&second, set_groceries).unwrap();
        // Using the first session makes the second the oldest.
        sessions.get(&first).unwrap();
        sessions.update(&third, set_groceries).unwrap();

        assert_eq!(sessions.len(), 2);
        let groceries = |session_id: &SessionId| {
            sessions
                .get(session_id)
                .unwrap()
                .weekly_budget(ExpenseCategory::Groceries)
        };
        assert_eq!(groceries(&first), 70.0);
        assert_eq!(groceries(&second), 50.0);
        assert_eq!(groceries(&third), 70.0);
    }
}
