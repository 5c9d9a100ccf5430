use crate::auth::require_auth;
use crate::handlers;
use crate::state::AppState;
use axum::{middleware, routing::get, Router};

pub fn router(state: AppState) -> Router {
    let gated = Router::new()
        .route("/", get(handlers::index))
        .route("/api/issues", get(handlers::get_issues))
        .route("/api/pageviews", get(handlers::get_pageviews))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(gated)
        .route("/_data/:filename", get(handlers::data_file))
        .with_state(state)
}
