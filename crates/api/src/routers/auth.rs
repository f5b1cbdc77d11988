use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    middleware::from_fn,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Extension, Form, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use db::{
    models::{Session, User},
    utils::is_unique_violation,
};
use entities::{SignInRequest, Token};
use serde::Deserialize;
use tera::Context;
use web::{errors::AppError, AppState};

use crate::{
    auth_middleware::{auth_middleware, removal_cookie, session_cookie, Identity, SIGN_OUT_PATH},
    common::users::{self, Registration},
    error::ApiError,
    TEMPLATES,
};

const NO_CACHE: [(header::HeaderName, &str); 3] = [
    (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate, max-age=0"),
    (header::PRAGMA, "no-cache"),
    (header::EXPIRES, "0"),
];

fn render_login(
    state: &AppState,
    error: Option<&str>,
    status_code: StatusCode,
) -> Result<axum::response::Response, AppError> {
    let mut context = Context::new();
    context.insert("title", "KageMarks");
    context.insert("error", &error);
    context.insert("allow_signups", &state.config.accounts.allow_signups);
    Ok((status_code, Html(TEMPLATES.render("login.html", &context)?)).into_response())
}

async fn sign_in(
    user: User,
    jar: CookieJar,
    state: &Arc<AppState>,
) -> Result<axum::response::Response, AppError> {
    let session = Session::create(user.id, state.config.session.lifetime(), &state.db_pool).await?;
    log::info!("User {} signed in", user.name);
    Ok((
        jar.add(session_cookie(&state.config.session, &session)),
        Redirect::to("/"),
    )
        .into_response())
}

#[derive(Deserialize)]
pub struct LoginQuery {
    error: Option<String>,
}

pub async fn http_get_login(
    state: State<Arc<AppState>>,
    Extension(identity): Extension<Option<Identity>>,
    Query(query): Query<LoginQuery>,
) -> Result<impl IntoResponse, AppError> {
    if identity.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    render_login(&state, query.error.as_deref(), StatusCode::OK)
}

#[derive(Deserialize)]
pub struct LoginBody {
    username: String,
    password: String,
}

pub async fn http_post_login(
    state: State<Arc<AppState>>,
    Extension(identity): Extension<Option<Identity>>,
    jar: CookieJar,
    Form(body): Form<LoginBody>,
) -> Result<impl IntoResponse, AppError> {
    if identity.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    match users::verify_credentials(&body.username, body.password, &state).await? {
        Some(user) => sign_in(user, jar, &state).await,
        None => render_login(
            &state,
            Some("Invalid username or password"),
            StatusCode::UNAUTHORIZED,
        ),
    }
}

#[derive(Deserialize)]
pub struct SignUpBody {
    username: String,
    email: String,
    full_name: Option<String>,
    password: String,
}

pub async fn http_post_signup(
    state: State<Arc<AppState>>,
    jar: CookieJar,
    Form(body): Form<SignUpBody>,
) -> Result<impl IntoResponse, AppError> {
    if !state.config.accounts.allow_signups {
        return render_login(&state, Some("Sign-ups are disabled"), StatusCode::FORBIDDEN);
    }

    let registration = Registration {
        name: body.username.trim().to_string(),
        email: body.email.trim().to_string(),
        full_name: body.full_name,
        password: body.password,
    };
    if let Some(problem) = registration.problem() {
        return render_login(&state, Some(problem), StatusCode::UNPROCESSABLE_ENTITY);
    }
    if User::by_name(&registration.name, &state.db_pool)
        .await?
        .is_some()
    {
        return render_login(&state, Some("Username is taken"), StatusCode::CONFLICT);
    }

    match users::register(registration, &state).await {
        Ok(user) => sign_in(user, jar, &state).await,
        // Lost a race with a concurrent sign-up for the same name
        Err(err) if is_unique_violation(&err) => {
            render_login(&state, Some("Username is taken"), StatusCode::CONFLICT)
        }
        Err(err) => Err(err.into()),
    }
}

/// Never fails: the redirect and cookie cleanup happen even if the session
/// can't be invalidated server-side.
pub async fn http_get_sign_out(state: State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let session_config = &state.config.session;

    if let Some(cookie) = jar.get(&session_config.cookie_name()) {
        if let Err(err) = Session::delete_by_token(cookie.value(), &state.db_pool).await {
            log::error!("Failed to invalidate session on sign-out, {:#?}", err);
        }
    }

    let owned_cookies: Vec<String> = jar
        .iter()
        .map(|cookie| cookie.name().to_string())
        .filter(|name| session_config.owns_cookie(name))
        .collect();
    let jar = owned_cookies
        .into_iter()
        .fold(jar, |jar, name| jar.remove(removal_cookie(name)));

    (jar, NO_CACHE, Redirect::to("/login"))
}

pub async fn http_post_token(
    state: State<Arc<AppState>>,
    Json(body): Json<SignInRequest>,
) -> Result<impl IntoResponse, AppError> {
    match users::verify_credentials(&body.username, body.password, &state).await? {
        Some(user) => {
            let session =
                Session::create(user.id, state.config.session.lifetime(), &state.db_pool).await?;
            Ok(Json(Token::bearer(session.token, session.expires_at)).into_response())
        }
        None => Ok(ApiError::invalid_grant().into_response()),
    }
}

pub async fn http_post_api_sign_out(
    state: State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, AppError> {
    identity.session.delete(&state.db_pool).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn auth() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(http_get_login).post(http_post_login))
        .route("/signup", post(http_post_signup))
        .route(SIGN_OUT_PATH, get(http_get_sign_out))
        .route("/api/auth/token", post(http_post_token))
        .merge(
            Router::new()
                .route("/api/auth/signout", post(http_post_api_sign_out))
                .route_layer(from_fn(auth_middleware)),
        )
}
