use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adapters::http::app_state::AppState;
use crate::app_error::{AppError, AppResult};
use crate::application::jwt;
use crate::application::use_cases::users::RegisterInput;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(request_login_link))
        .route("/magic", get(consume_login_link))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    date_of_birth: Option<NaiveDate>,
    gender: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterResponse {
    id: Uuid,
    email: String,
}

async fn register(
    State(app_state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let user = app_state
        .auth_use_cases
        .register(RegisterInput {
            name: body.name,
            email: body.email,
            phone: body.phone,
            address: body.address,
            date_of_birth: body.date_of_birth,
            gender: body.gender,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            email: user.email,
        }),
    ))
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
}

async fn request_login_link(
    State(app_state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<StatusCode> {
    app_state
        .auth_use_cases
        .request_magic_link(&body.email, app_state.config.magic_link_ttl_minutes)
        .await?;
    // Identical response whether or not the address exists.
    Ok(StatusCode::ACCEPTED)
}

#[derive(Deserialize)]
struct MagicQuery {
    token: String,
}

async fn consume_login_link(
    State(app_state): State<AppState>,
    Query(query): Query<MagicQuery>,
) -> AppResult<(StatusCode, HeaderMap)> {
    let user_id = app_state
        .auth_use_cases
        .consume_magic_link(&query.token)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    Ok((StatusCode::NO_CONTENT, session_headers(&app_state, user_id)?))
}

async fn refresh(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(StatusCode, HeaderMap)> {
    let Some(refresh_cookie) = jar.get("refresh_token") else {
        return Err(AppError::InvalidCredentials);
    };
    let claims = jwt::verify(refresh_cookie.value(), &app_state.config.jwt_secret)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidCredentials)?;

    Ok((StatusCode::NO_CONTENT, session_headers(&app_state, user_id)?))
}

async fn logout() -> AppResult<(StatusCode, HeaderMap)> {
    let mut headers = HeaderMap::new();
    for name in ["access_token", "refresh_token"] {
        let cookie = Cookie::build((name, ""))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(time::Duration::seconds(0))
            .build();
        headers.append(
            "set-cookie",
            cookie
                .to_string()
                .parse()
                .map_err(|_| AppError::Internal("invalid cookie header".into()))?,
        );
    }
    Ok((StatusCode::NO_CONTENT, headers))
}

/// Fresh access and refresh cookies for the given user.
fn session_headers(app_state: &AppState, user_id: Uuid) -> AppResult<HeaderMap> {
    let access = jwt::issue(
        user_id,
        &app_state.config.jwt_secret,
        app_state.config.access_token_ttl,
    )?;
    let refresh = jwt::issue(
        user_id,
        &app_state.config.jwt_secret,
        app_state.config.refresh_token_ttl,
    )?;

    let mut headers = HeaderMap::new();
    for (name, value, max_age) in [
        ("access_token", access, app_state.config.access_token_ttl),
        ("refresh_token", refresh, app_state.config.refresh_token_ttl),
    ] {
        let cookie = Cookie::build((name, value))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(max_age)
            .build();
        headers.append(
            "set-cookie",
            cookie
                .to_string()
                .parse()
                .map_err(|_| AppError::Internal("invalid cookie header".into()))?,
        );
    }
    Ok(headers)
}
