use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::adapters::persistence::PostgresPersistence;
use crate::app_error::{AppError, AppResult};
use crate::application::use_cases::voices::VoiceRepo;
use crate::domain::entities::voice::{VoiceMessage, VoiceStatus};

#[derive(sqlx::FromRow, Debug)]
pub struct VoiceRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub status: String,
    pub admin_notes: Option<String>,
    pub published_online: bool,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<VoiceRow> for VoiceMessage {
    fn from(row: VoiceRow) -> Self {
        let status = row.status.parse::<VoiceStatus>().unwrap_or_else(|_| {
            warn!(value = %row.status, id = %row.id, "unknown voice status in db");
            VoiceStatus::Pending
        });
        VoiceMessage {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            message: row.message,
            status,
            admin_notes: row.admin_notes,
            published_online: row.published_online,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const VOICE_COLUMNS: &str = "id, user_id, title, message, status, admin_notes, \
     published_online, published_at, created_at, updated_at";

#[async_trait]
impl VoiceRepo for PostgresPersistence {
    async fn insert(&self, message: &VoiceMessage) -> AppResult<VoiceMessage> {
        let sql = format!(
            "INSERT INTO voice_messages (id, user_id, title, message, status) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {VOICE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, VoiceRow>(&sql)
            .bind(message.id)
            .bind(message.user_id)
            .bind(&message.title)
            .bind(&message.message)
            .bind(message.status.as_ref())
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<VoiceMessage>> {
        let sql = format!("SELECT {VOICE_COLUMNS} FROM voice_messages WHERE id = $1");
        let row = sqlx::query_as::<_, VoiceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(row.map(VoiceMessage::from))
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<VoiceMessage>> {
        let sql = format!(
            "SELECT {VOICE_COLUMNS} FROM voice_messages \
             WHERE user_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, VoiceRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(rows.into_iter().map(VoiceMessage::from).collect())
    }

    async fn list_by_status(&self, status: Option<VoiceStatus>) -> AppResult<Vec<VoiceMessage>> {
        let sql = format!(
            "SELECT {VOICE_COLUMNS} FROM voice_messages \
             WHERE ($1::text IS NULL OR status = $1) ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, VoiceRow>(&sql)
            .bind(status.map(|s| s.as_ref().to_string()))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(rows.into_iter().map(VoiceMessage::from).collect())
    }

    async fn list_public(&self, now: NaiveDateTime) -> AppResult<Vec<VoiceMessage>> {
        let sql = format!(
            "SELECT {VOICE_COLUMNS} FROM voice_messages \
             WHERE status = $1 AND published_online AND published_at <= $2 \
             ORDER BY published_at DESC"
        );
        let rows = sqlx::query_as::<_, VoiceRow>(&sql)
            .bind(VoiceStatus::Approved.as_ref())
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(rows.into_iter().map(VoiceMessage::from).collect())
    }

    async fn update(&self, message: &VoiceMessage) -> AppResult<VoiceMessage> {
        let sql = format!(
            "UPDATE voice_messages SET title = $2, message = $3, status = $4, \
             admin_notes = $5, published_online = $6, published_at = $7, updated_at = now() \
             WHERE id = $1 RETURNING {VOICE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, VoiceRow>(&sql)
            .bind(message.id)
            .bind(&message.title)
            .bind(&message.message)
            .bind(message.status.as_ref())
            .bind(&message.admin_notes)
            .bind(message.published_online)
            .bind(message.published_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM voice_messages WHERE id = $1")
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
