//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_htmx::{HxRedirect, HxRequest};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    dashboard::{get_dashboard_page, set_budget_endpoint, update_dashboard},
    endpoints,
    esg::{compare_report_endpoint, get_esg_page},
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::ESG_VIEW, get(get_esg_page))
        .route(endpoints::DASHBOARD_API, post(update_dashboard))
        .route(endpoints::BUDGET_API, post(set_budget_endpoint))
        .route(endpoints::ESG_COMPARE_API, post(compare_report_endpoint))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
///
/// htmx requests get the `HX-Redirect` header so the whole page changes
/// instead of the dashboard being swapped into the target element.
async fn get_index_page(HxRequest(is_htmx_request): HxRequest) -> Response {
    if is_htmx_request {
        (
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            StatusCode::OK,
        )
            .into_response()
    } else {
        Redirect::to(endpoints::DASHBOARD_VIEW).into_response()
    }
}
