use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adapters::http::app_state::AppState;
use crate::adapters::http::routes::current_user;
use crate::adapters::http::routes::user::UserResponse;
use crate::app_error::{AppError, AppResult};
use crate::application::use_cases::users::RegisterInput;
use crate::domain::entities::application::ApplicationStatus;
use crate::domain::entities::content::{ContentFields, ContentKind};
use crate::domain::entities::user::{UserStatus, UserType};
use crate::domain::entities::voice::VoiceStatus;

pub fn router() -> Router<AppState> {
    Router::new()
        // Users
        .route("/users", get(list_users))
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/standing", patch(update_standing))
        // Membership applications
        .route("/applications", get(list_applications))
        .route("/applications/{id}/approve", post(approve_application))
        .route("/applications/{id}/reject", post(reject_application))
        // Voice-of-change moderation
        .route("/voices", get(list_voices))
        .route("/voices/{id}/approve", post(approve_voice))
        .route("/voices/{id}/reject", post(reject_voice))
        .route("/voices/{id}/unpublish", post(unpublish_voice))
        // Content
        .route("/content/{kind}", get(list_content))
        .route("/content/{kind}", post(create_content))
        .route("/content/{kind}/{id}", patch(update_content))
        .route("/content/{kind}/{id}", delete(delete_content))
        .route("/media", post(upload_media))
}

// ============================================================================
// Users
// ============================================================================

async fn list_users(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let actor = current_user(&jar, &app_state).await?;
    let users = app_state.users_use_cases.admin_list(&actor).await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(users))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserRequest {
    name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    gender: Option<String>,
}

async fn create_user(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    let actor = current_user(&jar, &app_state).await?;
    let user = app_state
        .users_use_cases
        .admin_create(
            &actor,
            RegisterInput {
                name: body.name,
                email: body.email,
                phone: body.phone,
                address: body.address,
                date_of_birth: None,
                gender: body.gender,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

async fn get_user(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let actor = current_user(&jar, &app_state).await?;
    let user = app_state.users_use_cases.admin_get(&actor, id).await?;
    Ok(Json(UserResponse::from(user)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStandingRequest {
    user_type: UserType,
    status: UserStatus,
    is_active: bool,
}

async fn update_standing(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStandingRequest>,
) -> AppResult<impl IntoResponse> {
    let actor = current_user(&jar, &app_state).await?;
    let user = app_state
        .users_use_cases
        .admin_update_standing(&actor, id, body.user_type, body.status, body.is_active)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

// ============================================================================
// Membership applications
// ============================================================================

#[derive(Deserialize)]
struct ApplicationFilter {
    status: Option<ApplicationStatus>,
}

async fn list_applications(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Query(filter): Query<ApplicationFilter>,
) -> AppResult<impl IntoResponse> {
    let actor = current_user(&jar, &app_state).await?;
    let applications = app_state
        .applications_use_cases
        .admin_list(&actor, filter.status)
        .await?;
    Ok(Json(applications))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
#[derive(Default)]
struct ProcessRequest {
    admin_notes: Option<String>,
}

async fn approve_application(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
    body: Option<Json<ProcessRequest>>,
) -> AppResult<impl IntoResponse> {
    let actor = current_user(&jar, &app_state).await?;
    let notes = body.map(|Json(b)| b.admin_notes).unwrap_or_default();
    let application = app_state
        .applications_use_cases
        .approve(&actor, id, notes)
        .await?;
    Ok(Json(application))
}

async fn reject_application(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
    body: Option<Json<ProcessRequest>>,
) -> AppResult<impl IntoResponse> {
    let actor = current_user(&jar, &app_state).await?;
    let notes = body.map(|Json(b)| b.admin_notes).unwrap_or_default();
    let application = app_state
        .applications_use_cases
        .reject(&actor, id, notes)
        .await?;
    Ok(Json(application))
}

// ============================================================================
// Voice-of-change moderation
// ============================================================================

#[derive(Deserialize)]
struct VoiceFilter {
    status: Option<VoiceStatus>,
}

async fn list_voices(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Query(filter): Query<VoiceFilter>,
) -> AppResult<impl IntoResponse> {
    let actor = current_user(&jar, &app_state).await?;
    let records = app_state
        .voices_use_cases
        .admin_list(&actor, filter.status)
        .await?;
    Ok(Json(records))
}

async fn approve_voice(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
    body: Option<Json<ProcessRequest>>,
) -> AppResult<impl IntoResponse> {
    let actor = current_user(&jar, &app_state).await?;
    let notes = body.map(|Json(b)| b.admin_notes).unwrap_or_default();
    let record = app_state.voices_use_cases.approve(&actor, id, notes).await?;
    Ok(Json(record))
}

async fn reject_voice(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
    body: Option<Json<ProcessRequest>>,
) -> AppResult<impl IntoResponse> {
    let actor = current_user(&jar, &app_state).await?;
    let notes = body
        .and_then(|Json(b)| b.admin_notes)
        .unwrap_or_default();
    let record = app_state.voices_use_cases.reject(&actor, id, &notes).await?;
    Ok(Json(record))
}

async fn unpublish_voice(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let actor = current_user(&jar, &app_state).await?;
    let record = app_state.voices_use_cases.unpublish(&actor, id).await?;
    Ok(Json(record))
}

// ============================================================================
// Content
// ============================================================================

async fn list_content(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(kind): Path<ContentKind>,
) -> AppResult<impl IntoResponse> {
    let actor = current_user(&jar, &app_state).await?;
    let records = app_state.content_use_cases.admin_list(&actor, kind).await?;
    Ok(Json(records))
}

async fn create_content(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(kind): Path<ContentKind>,
    Json(fields): Json<ContentFields>,
) -> AppResult<impl IntoResponse> {
    let actor = current_user(&jar, &app_state).await?;
    let record = app_state
        .content_use_cases
        .create(&actor, kind, fields)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_content(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path((kind, id)): Path<(ContentKind, Uuid)>,
    Json(fields): Json<ContentFields>,
) -> AppResult<impl IntoResponse> {
    let actor = current_user(&jar, &app_state).await?;
    let record = app_state
        .content_use_cases
        .update(&actor, kind, id, fields)
        .await?;
    Ok(Json(record))
}

async fn delete_content(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path((kind, id)): Path<(ContentKind, Uuid)>,
) -> AppResult<StatusCode> {
    let actor = current_user(&jar, &app_state).await?;
    app_state.content_use_cases.delete(&actor, kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
struct UploadResponse {
    reference: String,
}

/// Accepts a single multipart file field and returns the stored
/// reference for use in a subsequent content create/update.
async fn upload_media(
    State(app_state): State<AppState>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let actor = current_user(&jar, &app_state).await?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(e.to_string()))?
        .ok_or_else(|| AppError::validation("file", "A file field is required"))?;

    let filename = field
        .file_name()
        .map(|name| name.to_string())
        .ok_or_else(|| AppError::validation("file", "The file field must carry a filename"))?;
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::InvalidInput(e.to_string()))?
        .to_vec();

    let reference = app_state
        .content_use_cases
        .upload_media(&actor, &filename, bytes)
        .await?;
    Ok((StatusCode::CREATED, Json(UploadResponse { reference })))
}
