use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Extension, Form, Router,
};
use db::types::DbId;
use entities::NewBookmark;
use serde::{Deserialize, Serialize};
use tera::Context;
use url::form_urlencoded;
use web::{errors::AppError, AppState};

use crate::{auth_middleware::Identity, common::bookmarks, TEMPLATES};

#[derive(Serialize)]
struct BookmarkCard {
    id: String,
    title: String,
    url: String,
    hostname: String,
    created_on: String,
}

impl From<entities::Bookmark> for BookmarkCard {
    fn from(bookmark: entities::Bookmark) -> Self {
        Self {
            hostname: bookmark.hostname().unwrap_or_else(|| bookmark.url.clone()),
            created_on: bookmark.created_at.format("%Y-%m-%d").to_string(),
            id: bookmark.id,
            title: bookmark.title,
            url: bookmark.url,
        }
    }
}

fn redirect_with_error(message: &str) -> Redirect {
    let message: String = form_urlencoded::byte_serialize(message.as_bytes()).collect();
    Redirect::to(&format!("/?error={message}"))
}

#[derive(Deserialize)]
pub struct HomeQuery {
    error: Option<String>,
}

pub async fn http_get_home(
    state: State<Arc<AppState>>,
    Extension(identity): Extension<Option<Identity>>,
    Query(query): Query<HomeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let Some(identity) = identity else {
        return Ok(Redirect::to("/login").into_response());
    };

    let cards: Vec<BookmarkCard> = bookmarks::list(&identity.user.id, &state)
        .await?
        .into_iter()
        .map(BookmarkCard::from)
        .collect();
    let user = entities::User::from(identity.user);

    let mut context = Context::new();
    context.insert("title", "KageMarks");
    context.insert("display_name", user.display_name());
    context.insert("email", &user.email);
    context.insert("bookmarks", &cards);
    context.insert("error", &query.error);
    Ok(Html(TEMPLATES.render("home.html", &context)?).into_response())
}

pub async fn http_post_bookmark(
    state: State<Arc<AppState>>,
    Extension(identity): Extension<Option<Identity>>,
    Form(body): Form<NewBookmark>,
) -> Result<impl IntoResponse, AppError> {
    let Some(identity) = identity else {
        return Ok(Redirect::to("/login"));
    };

    if let Err(err) = body.validate() {
        return Ok(redirect_with_error(err.message()));
    }

    match bookmarks::create(&identity.user.id, body, &state).await {
        Ok(_) => Ok(Redirect::to("/")),
        Err(err) => {
            log::error!("Failed to save bookmark, {:#?}", err);
            Ok(redirect_with_error("Failed to save bookmark"))
        }
    }
}

pub async fn http_post_delete_bookmark(
    state: State<Arc<AppState>>,
    Extension(identity): Extension<Option<Identity>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(identity) = identity else {
        return Ok(Redirect::to("/login"));
    };

    match bookmarks::delete(&DbId::from(id), &identity.user.id, &state).await {
        Ok(true) => Ok(Redirect::to("/")),
        Ok(false) => Ok(redirect_with_error("Failed to delete: bookmark not found")),
        Err(err) => {
            log::error!("Failed to delete bookmark, {:#?}", err);
            Ok(redirect_with_error("Failed to delete bookmark"))
        }
    }
}

pub fn ui() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(http_get_home))
        .route("/bookmarks", post(http_post_bookmark))
        .route("/bookmarks/:id/delete", post(http_post_delete_bookmark))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn card_shows_hostname_and_date() {
        let card = BookmarkCard::from(entities::Bookmark {
            id: String::from("b1"),
            title: String::from("Example"),
            url: String::from("https://example.com/docs"),
            user_id: String::from("u1"),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        });
        assert_eq!(card.hostname, "example.com");
        assert_eq!(card.created_on, "2024-05-01");
    }

    #[test]
    fn error_redirect_is_encoded() {
        let response = redirect_with_error("Title is too long").into_response();
        assert_eq!(
            response.headers()["location"],
            "/?error=Title+is+too+long"
        );
    }
}
