use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn,
    response::IntoResponse,
    routing::{delete, get},
    Extension, Json, Router,
};
use db::types::DbId;
use entities::NewBookmark;
use web::{errors::AppError, AppState};

use crate::{
    auth_middleware::{auth_middleware, Identity},
    common::bookmarks,
    error::ApiError,
};

pub async fn http_get_bookmarks(
    state: State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(bookmarks::list(&identity.user.id, &state).await?))
}

pub async fn http_post_bookmark(
    state: State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<NewBookmark>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(err) = body.validate() {
        return Ok(ApiError::from(err).into_response());
    }

    let bookmark = bookmarks::create(&identity.user.id, body, &state).await?;
    Ok((StatusCode::CREATED, Json(bookmark)).into_response())
}

pub async fn http_delete_bookmark(
    state: State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if bookmarks::delete(&DbId::from(id), &identity.user.id, &state).await? {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Ok(ApiError::not_found().into_response())
    }
}

pub async fn http_get_user(Extension(identity): Extension<Identity>) -> impl IntoResponse {
    Json(entities::User::from(identity.user))
}

pub fn bookmarks() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/bookmarks",
            get(http_get_bookmarks).post(http_post_bookmark),
        )
        .route("/api/bookmarks/:id", delete(http_delete_bookmark))
        .route("/api/user", get(http_get_user))
        .route_layer(from_fn(auth_middleware))
}
