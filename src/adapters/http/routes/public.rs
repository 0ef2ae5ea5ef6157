use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

use crate::adapters::http::app_state::AppState;
use crate::app_error::AppResult;
use crate::domain::entities::content::ContentKind;
use crate::domain::entities::voice::VoiceMessage;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/voices", get(list_voices))
        .route("/content/{kind}", get(list_content))
}

/// Public shape of a voice message: no owner, no moderation notes.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PublicVoiceResponse {
    id: Uuid,
    title: String,
    message: String,
    published_at: Option<NaiveDateTime>,
}

impl From<VoiceMessage> for PublicVoiceResponse {
    fn from(record: VoiceMessage) -> Self {
        PublicVoiceResponse {
            id: record.id,
            title: record.title,
            message: record.message,
            published_at: record.published_at,
        }
    }
}

async fn list_voices(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let records = app_state.voices_use_cases.list_public().await?;
    let records: Vec<PublicVoiceResponse> =
        records.into_iter().map(PublicVoiceResponse::from).collect();
    Ok(Json(records))
}

async fn list_content(
    State(app_state): State<AppState>,
    Path(kind): Path<ContentKind>,
) -> AppResult<impl IntoResponse> {
    let records = app_state.content_use_cases.public_list(kind).await?;
    Ok(Json(records))
}
