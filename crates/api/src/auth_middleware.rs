use std::{future::Future, sync::Arc};

use axum::{
    extract::{State, TypedHeader},
    headers::authorization::{Authorization, Bearer},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use db::models::{Session, User};
use lazy_static::lazy_static;
use regex::Regex;
use web::{config, errors::AppError, AppState};

use crate::error::ApiError;

pub const SIGN_OUT_PATH: &str = "/auth/signout";

lazy_static! {
    static ref BYPASS_RE: Regex =
        Regex::new(r"^/(assets/.*|favicon\.ico|auth/signout)$|\.(svg|png|jpg|jpeg|gif|webp)$")
            .unwrap(); // Panic safety: hardcoded pattern
}

/// The signed-in account for the current request, resolved fresh every time.
#[derive(Clone, Debug)]
pub struct Identity {
    pub session: Session,
    pub user: User,
}

/// Static files and the sign-out route never touch the session.
pub fn is_bypassed(path: &str) -> bool {
    BYPASS_RE.is_match(path)
}

pub fn session_cookie(config: &config::Session, session: &Session) -> Cookie<'static> {
    let max_age = (session.expires_at - Utc::now()).num_seconds().max(0);
    Cookie::build(config.cookie_name(), session.token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies)
        .max_age(time::Duration::seconds(max_age))
        .finish()
}

pub fn removal_cookie(name: String) -> Cookie<'static> {
    Cookie::build(name, "").path("/").finish()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TokenSource {
    Cookie,
    Bearer,
}

struct Resolution<T> {
    found: Option<(TokenSource, T)>,
    /// The cookie named a session that no longer exists or has expired.
    dead_cookie: bool,
}

/// Tries each token in order and stops at the first live session, so a stale
/// cookie doesn't shadow a valid Bearer token.
async fn first_live<T, F, Fut>(
    candidates: Vec<(TokenSource, String)>,
    mut lookup: F,
) -> anyhow::Result<Resolution<T>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = anyhow::Result<Option<T>>>,
{
    let mut dead_cookie = false;
    for (source, token) in candidates {
        match lookup(token).await? {
            Some(found) => {
                return Ok(Resolution {
                    found: Some((source, found)),
                    dead_cookie,
                });
            }
            None => dead_cookie |= source == TokenSource::Cookie,
        }
    }
    Ok(Resolution {
        found: None,
        dead_cookie,
    })
}

/// Expired sessions are deleted on sight.
async fn live_session(
    token: String,
    now: DateTime<Utc>,
    state: &AppState,
) -> anyhow::Result<Option<Session>> {
    match Session::by_token(&token, &state.db_pool).await? {
        Some(session) if !session.is_expired(now) => Ok(Some(session)),
        Some(session) => {
            log::debug!("Session {} expired", session.id);
            session.delete(&state.db_pool).await?;
            Ok(None)
        }
        None => Ok(None),
    }
}

/// Resolves the session behind the cookie or Bearer token, slides its expiry
/// when it is close to running out, and hands `Option<Identity>` to handlers.
pub async fn session_middleware<B>(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, AppError> {
    if is_bypassed(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let session_config = &state.config.session;
    let cookie_name = session_config.cookie_name();

    let mut candidates = Vec::new();
    if let Some(cookie) = jar.get(&cookie_name) {
        candidates.push((TokenSource::Cookie, cookie.value().to_string()));
    }
    if let Some(TypedHeader(auth)) = bearer {
        candidates.push((TokenSource::Bearer, auth.token().to_string()));
    }

    let now = Utc::now();
    let resolution = first_live(candidates, |token| live_session(token, now, &state)).await?;

    let mut jar = jar;
    if resolution.dead_cookie {
        jar = jar.remove(removal_cookie(cookie_name));
    }

    let identity = match resolution.found {
        Some((source, session)) => {
            let session = if session.needs_refresh(now, session_config.refresh_threshold()) {
                log::debug!("Refreshing session {}", session.id);
                let refreshed = session
                    .refresh(session_config.lifetime(), &state.db_pool)
                    .await?;
                if source == TokenSource::Cookie {
                    jar = jar.add(session_cookie(session_config, &refreshed));
                }
                refreshed
            } else {
                session
            };
            let user = session.user(&state.db_pool).await?;
            Some(Identity { session, user })
        }
        None => None,
    };

    request.extensions_mut().insert(identity);
    let response = next.run(request).await;
    Ok((jar, response).into_response())
}

/// Route layer for endpoints that need a signed-in caller.
pub async fn auth_middleware<B>(
    Extension(identity): Extension<Option<Identity>>,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, ApiError> {
    if let Some(identity) = identity {
        request.extensions_mut().insert(identity);
        Ok(next.run(request).await)
    } else {
        Err(ApiError::unauthenticated())
    }
}
