use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;
use uuid::Uuid;

use crate::adapters::persistence::{PostgresPersistence, map_constraint};
use crate::app_error::{AppError, AppResult};
use crate::application::use_cases::users::{ProfileFields, UserRepo};
use crate::domain::entities::user::{User, UserStatus, UserType};

// User row as stored in the db; the enums live in TEXT columns.
#[derive(sqlx::FromRow, Debug)]
pub struct UserRow {
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
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let user_type = row.user_type.parse::<UserType>().unwrap_or_else(|_| {
            warn!(value = %row.user_type, user_id = %row.id, "unknown user_type in db, treating as guest");
            UserType::Guest
        });
        let status = row.status.parse::<UserStatus>().unwrap_or_else(|_| {
            warn!(value = %row.status, user_id = %row.id, "unknown status in db, treating as inactive");
            UserStatus::Inactive
        });
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            user_type,
            status,
            is_active: row.is_active,
            membership_number: row.membership_number,
            phone: row.phone,
            address: row.address,
            date_of_birth: row.date_of_birth,
            gender: row.gender,
            designation: row.designation,
            profile_photo: row.profile_photo,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const USER_COLUMNS: &str = "id, name, email, user_type, status, is_active, membership_number, \
     phone, address, date_of_birth, gender, designation, profile_photo, created_at, updated_at";

#[async_trait]
impl UserRepo for PostgresPersistence {
    async fn insert(&self, user: &User) -> AppResult<User> {
        let sql = format!(
            "INSERT INTO users (id, name, email, user_type, status, is_active, membership_number, \
             phone, address, date_of_birth, gender, designation, profile_photo) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.user_type.as_ref())
            .bind(user.status.as_ref())
            .bind(user.is_active)
            .bind(&user.membership_number)
            .bind(&user.phone)
            .bind(&user.address)
            .bind(user.date_of_birth)
            .bind(&user.gender)
            .bind(&user.designation)
            .bind(&user.profile_photo)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_constraint(e, "users_email_key", || {
                    AppError::validation("email", "Email is already registered")
                })
            })?;
        Ok(row.into())
    }

    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(row.map(User::from))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY name");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn update_profile(&self, user_id: Uuid, fields: &ProfileFields) -> AppResult<User> {
        let sql = format!(
            "UPDATE users SET name = $2, phone = $3, address = $4, date_of_birth = $5, \
             gender = $6, designation = $7, profile_photo = $8, updated_at = now() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id)
            .bind(fields.name.trim())
            .bind(&fields.phone)
            .bind(&fields.address)
            .bind(fields.date_of_birth)
            .bind(&fields.gender)
            .bind(&fields.designation)
            .bind(&fields.profile_photo)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(row.into())
    }

    async fn update_standing(
        &self,
        user_id: Uuid,
        user_type: UserType,
        status: UserStatus,
        is_active: bool,
    ) -> AppResult<User> {
        let sql = format!(
            "UPDATE users SET user_type = $2, status = $3, is_active = $4, updated_at = now() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id)
            .bind(user_type.as_ref())
            .bind(status.as_ref())
            .bind(is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(row.into())
    }

    async fn set_membership_number(&self, user_id: Uuid, number: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET membership_number = $2, updated_at = now() WHERE id = $1")
            .bind(user_id)
            .bind(number)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }
}
