use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use uuid::Uuid;

use crate::adapters::http::app_state::AppState;
use crate::adapters::http::routes::current_user;
use crate::app_error::AppResult;
use crate::domain::entities::user::UserType;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit))
        .route("/mine", get(list_mine))
        .route("/{id}", get(get_one))
        .route("/{id}", delete(cancel))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest {
    requested_user_type: UserType,
    #[serde(default)]
    application_data: serde_json::Value,
}

async fn submit(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SubmitRequest>,
) -> AppResult<impl IntoResponse> {
    let user = current_user(&jar, &app_state).await?;
    let data = if body.application_data.is_null() {
        serde_json::json!({})
    } else {
        body.application_data
    };
    let application = app_state
        .applications_use_cases
        .submit(&user, body.requested_user_type, data)
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

async fn list_mine(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let user = current_user(&jar, &app_state).await?;
    let applications = app_state.applications_use_cases.list_mine(&user).await?;
    Ok(Json(applications))
}

async fn get_one(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let user = current_user(&jar, &app_state).await?;
    let application = app_state.applications_use_cases.get(&user, id).await?;
    Ok(Json(application))
}

async fn cancel(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let user = current_user(&jar, &app_state).await?;
    app_state.applications_use_cases.cancel(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
