//! The API endpoints URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The bank transaction dashboard.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The ESG benchmark comparison dashboard.
pub const ESG_VIEW: &str = "/esg";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for recomputing the dashboard with new filters.
pub const DASHBOARD_API: &str = "/api/dashboard";
/// The route for setting the weekly budget of an expense category.
pub const BUDGET_API: &str = "/api/budget";
/// The route for comparing a submitted report against industry benchmarks.
pub const ESG_COMPARE_API: &str = "/api/esg/compare";
