use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, patch},
};
use axum_extra::extract::CookieJar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adapters::http::app_state::AppState;
use crate::adapters::http::routes::current_user;
use crate::app_error::AppResult;
use crate::application::use_cases::users::ProfileFields;
use crate::domain::entities::user::User;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me", patch(update_me))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub user_type: String,
    pub status: String,
    pub is_active: bool,
    pub membership_number: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub designation: Option<String>,
    pub profile_photo: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            user_type: user.user_type.to_string(),
            status: user.status.to_string(),
            is_active: user.is_active,
            membership_number: user.membership_number,
            phone: user.phone,
            address: user.address,
            date_of_birth: user.date_of_birth,
            gender: user.gender,
            designation: user.designation,
            profile_photo: user.profile_photo,
        }
    }
}

async fn get_me(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let user = current_user(&jar, &app_state).await?;
    Ok(Json(UserResponse::from(user)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileRequest {
    name: String,
    phone: Option<String>,
    address: Option<String>,
    date_of_birth: Option<NaiveDate>,
    gender: Option<String>,
    designation: Option<String>,
    profile_photo: Option<String>,
}

async fn update_me(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<UpdateProfileRequest>,
) -> AppResult<impl IntoResponse> {
    let user = current_user(&jar, &app_state).await?;
    let updated = app_state
        .users_use_cases
        .update_profile(
            &user,
            ProfileFields {
                name: body.name,
                phone: body.phone,
                address: body.address,
                date_of_birth: body.date_of_birth,
                gender: body.gender,
                designation: body.designation,
                profile_photo: body.profile_photo,
            },
        )
        .await?;
    Ok(Json(UserResponse::from(updated)))
}
