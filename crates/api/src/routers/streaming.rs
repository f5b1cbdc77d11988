use std::sync::Arc;

use async_stream::try_stream;
use axum::{
    extract::State,
    middleware::from_fn,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::get,
    Extension, Router,
};
use futures::stream::Stream;
use web::AppState;

use crate::auth_middleware::{auth_middleware, Identity};

pub async fn http_get_health() -> impl IntoResponse {
    String::from("OK").into_response()
}

/// Live INSERT/DELETE events for the caller's own bookmarks, as `change` SSE events.
pub async fn http_get_bookmark_stream(
    state: State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Sse<impl Stream<Item = anyhow::Result<Event>>> {
    let mut subscription = state.feed.subscribe(&identity.user.id).await;
    log::debug!("User {} opened a change stream", identity.user.id);

    Sse::new(try_stream! {
        yield Event::default().comment("subscribed");
        while let Some(event) = subscription.recv().await {
            yield Event::default().event("change").json_data(&event)?;
        }
    })
    .keep_alive(KeepAlive::default().text("thump"))
}

pub fn streaming() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/streaming/bookmarks",
            get(http_get_bookmark_stream).route_layer(from_fn(auth_middleware)),
        )
        .route("/api/streaming/health", get(http_get_health))
}
