pub mod auth;
pub mod bookmarks;
pub mod streaming;
pub mod ui;

use std::sync::Arc;

use axum::Router;
use web::AppState;

pub fn api() -> Router<Arc<AppState>> {
    Router::new()
        .merge(auth::auth())
        .merge(bookmarks::bookmarks())
        .merge(streaming::streaming())
        .merge(ui::ui())
}
