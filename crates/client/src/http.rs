use anyhow::anyhow;
use async_stream::try_stream;
use async_trait::async_trait;
use entities::{Bookmark, ChangeEvent, NewBookmark, SignInRequest, Token, User};
use futures::{Stream, StreamExt};
use reqwest::{header, Response, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::{
    session::{ChangeStream, SessionClient},
    sse::SseDecoder,
};

#[derive(Deserialize)]
struct ApiErrorBody {
    error: String,
    error_description: Option<String>,
}

/// [`SessionClient`] backed by the KageMarks HTTP API and a Bearer session token.
#[derive(Clone)]
pub struct HttpSessionClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl HttpSessionClient {
    pub fn new(base_url: Url, token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            token,
        }
    }

    /// Exchanges a username and password for a fresh session.
    pub async fn sign_in(base_url: Url, username: &str, password: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::new();
        let response = http
            .post(base_url.join("/api/auth/token")?)
            .json(&SignInRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let token: Token = check(response).await?.json().await?;
        log::debug!("Signed in, session expires at {}", token.expires_at);

        Ok(Self {
            http,
            base_url,
            token: token.access_token,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}

/// Turns non-2xx responses into errors carrying the server's message.
async fn check(response: Response) -> anyhow::Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match response.json::<ApiErrorBody>().await {
        Ok(body) => match body.error_description {
            Some(description) => Err(anyhow!("{}: {}", body.error, description)),
            None => Err(anyhow!("{}", body.error)),
        },
        Err(_) => Err(anyhow!("request failed with status {}", status)),
    }
}

fn change_events(response: Response) -> impl Stream<Item = anyhow::Result<ChangeEvent>> + Send {
    try_stream! {
        let mut decoder = SseDecoder::default();
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            for message in decoder.push(&chunk?)? {
                if message.event.as_deref() == Some("change") {
                    yield serde_json::from_str::<ChangeEvent>(&message.data)?;
                }
            }
        }
    }
}

#[async_trait]
impl SessionClient for HttpSessionClient {
    async fn current_user(&self) -> anyhow::Result<Option<User>> {
        let response = self
            .http
            .get(self.endpoint("/api/user")?)
            .bearer_auth(&self.token)
            .send()
            .await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        Ok(Some(check(response).await?.json().await?))
    }

    async fn sign_out(&self) -> anyhow::Result<()> {
        let response = self
            .http
            .post(self.endpoint("/api/auth/signout")?)
            .bearer_auth(&self.token)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn list_bookmarks(&self) -> anyhow::Result<Vec<Bookmark>> {
        let response = self
            .http
            .get(self.endpoint("/api/bookmarks")?)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn insert_bookmark(&self, bookmark: &NewBookmark) -> anyhow::Result<Bookmark> {
        let response = self
            .http
            .post(self.endpoint("/api/bookmarks")?)
            .bearer_auth(&self.token)
            .json(bookmark)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn delete_bookmark(&self, id: &str) -> anyhow::Result<()> {
        let mut url = self.endpoint("/api/bookmarks/")?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("base url can't hold a path"))?
            .pop_if_empty()
            .push(id);
        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn subscribe(&self) -> anyhow::Result<ChangeStream> {
        let response = self
            .http
            .get(self.endpoint("/api/streaming/bookmarks")?)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "text/event-stream")
            .send()
            .await?;
        Ok(Box::pin(change_events(check(response).await?)))
    }
}

#[cfg(test)]
mod tests {
    use std::{convert::Infallible, net::TcpListener};

    use axum::{
        extract::Path,
        http::{header, HeaderMap, StatusCode},
        response::{
            sse::{Event, Sse},
            IntoResponse, Response,
        },
        routing::{delete, get},
        Json, Router,
    };
    use entities::ChangeKind;
    use futures::stream;
    use serde_json::json;

    use super::*;

    const TOKEN: &str = "t0k3n";

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            == Some("Bearer t0k3n")
    }

    fn unauthorized() -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "This method requires an authenticated user" })),
        )
            .into_response()
    }

    async fn bookmark_stream(headers: HeaderMap) -> Response {
        if !authorized(&headers) {
            return unauthorized();
        }
        let events = vec![
            Ok::<_, Infallible>(Event::default().comment("subscribed")),
            Ok(Event::default().event("ping").data("not a change")),
            Ok(Event::default()
                .event("change")
                .json_data(ChangeEvent::delete("b1"))
                .unwrap()),
        ];
        Sse::new(stream::iter(events)).into_response()
    }

    async fn delete_bookmark(headers: HeaderMap, Path(id): Path<String>) -> Response {
        if !authorized(&headers) {
            return unauthorized();
        }
        if id == "b1" {
            StatusCode::NO_CONTENT.into_response()
        } else {
            (StatusCode::NOT_FOUND, Json(json!({ "error": "Record not found" }))).into_response()
        }
    }

    async fn insert_bookmark() -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "invalid_request", "error_description": "Title is too long" })),
        )
            .into_response()
    }

    async fn list_bookmarks() -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }

    fn serve() -> HttpSessionClient {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/api/streaming/bookmarks", get(bookmark_stream))
            .route("/api/bookmarks/:id", delete(delete_bookmark))
            .route("/api/bookmarks", get(list_bookmarks).post(insert_bookmark))
            .route("/api/user", get(|| async { unauthorized() }));

        tokio::spawn(async move {
            axum::Server::from_tcp(listener)
                .unwrap()
                .serve(app.into_make_service())
                .await
                .unwrap();
        });

        HttpSessionClient::new(
            Url::parse(&format!("http://{addr}")).unwrap(),
            TOKEN.to_string(),
        )
    }

    #[tokio::test]
    async fn change_stream_yields_only_change_events() {
        let client = serve();
        let mut changes = client.subscribe().await.unwrap();

        let event = changes.next().await.unwrap().unwrap();
        assert_eq!(event.event_type, ChangeKind::Delete);
        assert_eq!(event.old.unwrap().id, "b1");
        assert!(changes.next().await.is_none());
    }

    #[tokio::test]
    async fn delete_maps_status_codes() {
        let client = serve();

        client.delete_bookmark("b1").await.unwrap();

        let err = client.delete_bookmark("missing").await.unwrap_err();
        assert_eq!(err.to_string(), "Record not found");

        // The id is one path segment, never a path
        let err = client.delete_bookmark("b1/../b2").await.unwrap_err();
        assert_eq!(err.to_string(), "Record not found");
    }

    #[tokio::test]
    async fn error_bodies_become_messages() {
        let client = serve();

        let err = client
            .insert_bookmark(&NewBookmark::new("x".repeat(101), "https://example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid_request: Title is too long");

        let err = client.list_bookmarks().await.unwrap_err();
        assert!(err.to_string().starts_with("request failed with status 500"));
    }

    #[tokio::test]
    async fn rejected_session_reads_as_signed_out() {
        let client = serve();
        assert_eq!(client.current_user().await.unwrap(), None);

        let stranger = HttpSessionClient::new(client.base_url.clone(), String::from("nope"));
        let err = stranger.subscribe().await.err().unwrap();
        assert_eq!(err.to_string(), "This method requires an authenticated user");
    }
}
