pub mod admin;
pub mod applications;
pub mod auth;
pub mod public;
pub mod user;
pub mod voices;

use axum::Router;
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::adapters::http::app_state::AppState;
use crate::app_error::{AppError, AppResult};
use crate::application::jwt;
use crate::domain::entities::user::User;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/user", user::router())
        .nest("/applications", applications::router())
        .nest("/voices", voices::router())
        .nest("/admin", admin::router())
        .nest("/public", public::router())
}

/// Resolve the authenticated user from the access-token cookie. Every
/// protected handler goes through this; permission checks live in the
/// use cases.
pub async fn current_user(jar: &CookieJar, app_state: &AppState) -> AppResult<User> {
    let Some(access_cookie) = jar.get("access_token") else {
        return Err(AppError::InvalidCredentials);
    };
    let claims = jwt::verify(access_cookie.value(), &app_state.config.jwt_secret)?;
    let user_id =
        Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidCredentials)?;
    app_state
        .user_repo
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::InvalidCredentials)
}
