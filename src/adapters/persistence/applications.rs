use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::adapters::persistence::{PostgresPersistence, map_constraint};
use crate::app_error::{AppError, AppResult};
use crate::application::use_cases::applications::ApplicationRepo;
use crate::domain::entities::application::{ApplicationStatus, MembershipApplication};
use crate::domain::entities::user::UserType;

#[derive(sqlx::FromRow, Debug)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub requested_user_type: String,
    pub application_data: serde_json::Value,
    pub status: String,
    pub admin_notes: Option<String>,
    pub processed_by: Option<Uuid>,
    pub processed_at: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<ApplicationRow> for MembershipApplication {
    fn from(row: ApplicationRow) -> Self {
        let requested_user_type = row
            .requested_user_type
            .parse::<UserType>()
            .unwrap_or_else(|_| {
                warn!(value = %row.requested_user_type, id = %row.id, "unknown requested_user_type in db");
                UserType::Member
            });
        let status = row.status.parse::<ApplicationStatus>().unwrap_or_else(|_| {
            warn!(value = %row.status, id = %row.id, "unknown application status in db");
            ApplicationStatus::Pending
        });
        MembershipApplication {
            id: row.id,
            user_id: row.user_id,
            requested_user_type,
            application_data: row.application_data,
            status,
            admin_notes: row.admin_notes,
            processed_by: row.processed_by,
            processed_at: row.processed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const APPLICATION_COLUMNS: &str = "id, user_id, requested_user_type, application_data, status, \
     admin_notes, processed_by, processed_at, created_at, updated_at";

#[async_trait]
impl ApplicationRepo for PostgresPersistence {
    async fn insert(
        &self,
        application: &MembershipApplication,
    ) -> AppResult<MembershipApplication> {
        let sql = format!(
            "INSERT INTO membership_applications \
             (id, user_id, requested_user_type, application_data, status, admin_notes) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {APPLICATION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(application.id)
            .bind(application.user_id)
            .bind(application.requested_user_type.as_ref())
            .bind(&application.application_data)
            .bind(application.status.as_ref())
            .bind(&application.admin_notes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                // The partial unique index closes the check-then-insert
                // race on concurrent submissions.
                map_constraint(e, "membership_applications_one_pending", || {
                    AppError::conflict("A pending application already exists for this account")
                })
            })?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MembershipApplication>> {
        let sql =
            format!("SELECT {APPLICATION_COLUMNS} FROM membership_applications WHERE id = $1");
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(row.map(MembershipApplication::from))
    }

    async fn find_pending_for_user(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<MembershipApplication>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM membership_applications \
             WHERE user_id = $1 AND status = $2"
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(user_id)
            .bind(ApplicationStatus::Pending.as_ref())
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(row.map(MembershipApplication::from))
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<MembershipApplication>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM membership_applications \
             WHERE user_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(rows.into_iter().map(MembershipApplication::from).collect())
    }

    async fn list_by_status(
        &self,
        status: Option<ApplicationStatus>,
    ) -> AppResult<Vec<MembershipApplication>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM membership_applications \
             WHERE ($1::text IS NULL OR status = $1) ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(status.map(|s| s.as_ref().to_string()))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(rows.into_iter().map(MembershipApplication::from).collect())
    }

    async fn mark_processed(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        admin_notes: Option<String>,
        processed_by: Uuid,
        processed_at: chrono::NaiveDateTime,
    ) -> AppResult<Option<MembershipApplication>> {
        // Conditional on the row still being pending; a concurrent
        // processor makes this a zero-row update rather than a
        // double-process.
        let sql = format!(
            "UPDATE membership_applications SET status = $2, admin_notes = $3, \
             processed_by = $4, processed_at = $5, updated_at = now() \
             WHERE id = $1 AND status = $6 RETURNING {APPLICATION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(id)
            .bind(status.as_ref())
            .bind(&admin_notes)
            .bind(processed_by)
            .bind(processed_at)
            .bind(ApplicationStatus::Pending.as_ref())
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(row.map(MembershipApplication::from))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM membership_applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
