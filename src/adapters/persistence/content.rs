use async_trait::async_trait;
use uuid::Uuid;

use crate::adapters::persistence::PostgresPersistence;
use crate::app_error::{AppError, AppResult};
use crate::application::use_cases::content::ContentRepo;
use crate::domain::entities::content::{ContentKind, ContentRecord};

/// All seven content tables share the record shape; the kind picks the
/// table name. Kept as a closed match so a new kind cannot ship without
/// a table.
fn table(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::MemberProfiles => "member_profiles",
        ContentKind::Teams => "teams",
        ContentKind::Supporters => "supporters",
        ContentKind::Activities => "activities",
        ContentKind::Resources => "resources",
        ContentKind::GalleryImages => "gallery_images",
        ContentKind::WorkingAreas => "working_areas",
    }
}

const CONTENT_COLUMNS: &str =
    "id, name, description, photo, is_active, display_order, created_at, updated_at";

#[async_trait]
impl ContentRepo for PostgresPersistence {
    async fn insert(&self, kind: ContentKind, record: &ContentRecord) -> AppResult<ContentRecord> {
        let sql = format!(
            "INSERT INTO {} (id, name, description, photo, is_active, display_order) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {CONTENT_COLUMNS}",
            table(kind)
        );
        let row = sqlx::query_as::<_, ContentRecord>(&sql)
            .bind(record.id)
            .bind(&record.name)
            .bind(&record.description)
            .bind(&record.photo)
            .bind(record.is_active)
            .bind(record.display_order)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(row)
    }

    async fn find_by_id(&self, kind: ContentKind, id: Uuid) -> AppResult<Option<ContentRecord>> {
        let sql = format!(
            "SELECT {CONTENT_COLUMNS} FROM {} WHERE id = $1",
            table(kind)
        );
        sqlx::query_as::<_, ContentRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list(&self, kind: ContentKind, only_active: bool) -> AppResult<Vec<ContentRecord>> {
        let sql = format!(
            "SELECT {CONTENT_COLUMNS} FROM {} WHERE ($1 = false OR is_active) \
             ORDER BY display_order, name",
            table(kind)
        );
        sqlx::query_as::<_, ContentRecord>(&sql)
            .bind(only_active)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn update(&self, kind: ContentKind, record: &ContentRecord) -> AppResult<ContentRecord> {
        let sql = format!(
            "UPDATE {} SET name = $2, description = $3, photo = $4, is_active = $5, \
             display_order = $6, updated_at = now() WHERE id = $1 RETURNING {CONTENT_COLUMNS}",
            table(kind)
        );
        sqlx::query_as::<_, ContentRecord>(&sql)
            .bind(record.id)
            .bind(&record.name)
            .bind(&record.description)
            .bind(&record.photo)
            .bind(record.is_active)
            .bind(record.display_order)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn delete(&self, kind: ContentKind, id: Uuid) -> AppResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table(kind));
        let result = sqlx::query(&sql)
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
