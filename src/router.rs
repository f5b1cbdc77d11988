use std::sync::Arc;

use api::{auth_middleware::session_middleware, routers::api};
use axum::{middleware::from_fn_with_state, Router};
use tower_http::trace::TraceLayer;
use web::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(api())
        .merge(crate::assets::resources())
        // Runs for every request, including ones that bypass session work
        .layer(from_fn_with_state(Arc::clone(&state), session_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
