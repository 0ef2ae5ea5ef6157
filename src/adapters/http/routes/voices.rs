use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use uuid::Uuid;

use crate::adapters::http::app_state::AppState;
use crate::adapters::http::routes::current_user;
use crate::app_error::AppResult;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit))
        .route("/mine", get(list_mine))
        .route("/{id}", patch(update))
        .route("/{id}", delete(remove))
}

#[derive(Deserialize)]
struct VoiceBody {
    title: String,
    message: String,
}

async fn submit(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<VoiceBody>,
) -> AppResult<impl IntoResponse> {
    let user = current_user(&jar, &app_state).await?;
    let record = app_state
        .voices_use_cases
        .submit(&user, &body.title, &body.message)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_mine(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let user = current_user(&jar, &app_state).await?;
    let records = app_state.voices_use_cases.list_mine(&user).await?;
    Ok(Json(records))
}

async fn update(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
    Json(body): Json<VoiceBody>,
) -> AppResult<impl IntoResponse> {
    let user = current_user(&jar, &app_state).await?;
    let record = app_state
        .voices_use_cases
        .update(&user, id, &body.title, &body.message)
        .await?;
    Ok(Json(record))
}

async fn remove(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let user = current_user(&jar, &app_state).await?;
    app_state.voices_use_cases.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
