use std::sync::Arc;

use async_trait::async_trait;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::validators::is_valid_name;
use crate::domain::entities::content::{ContentFields, ContentKind, ContentRecord};
use crate::domain::entities::user::User;
use crate::domain::permissions::Capability;

// ============================================================================
// Ports
// ============================================================================

/// One store handles all seven content resources; the kind selects the
/// table.
#[async_trait]
pub trait ContentRepo: Send + Sync {
    async fn insert(&self, kind: ContentKind, record: &ContentRecord) -> AppResult<ContentRecord>;
    async fn find_by_id(&self, kind: ContentKind, id: Uuid) -> AppResult<Option<ContentRecord>>;
    /// `only_active` drives the public listings; ordering is by
    /// `display_order`, then name.
    async fn list(&self, kind: ContentKind, only_active: bool) -> AppResult<Vec<ContentRecord>>;
    async fn update(&self, kind: ContentKind, record: &ContentRecord) -> AppResult<ContentRecord>;
    async fn delete(&self, kind: ContentKind, id: Uuid) -> AppResult<()>;
}

/// Binary blob storage for photos and documents. `store` returns a
/// stable reference kept on the record.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn store(&self, folder: &str, filename: &str, bytes: Vec<u8>) -> AppResult<String>;
    async fn delete(&self, reference: &str) -> AppResult<()>;
}

// ============================================================================
// Use Cases
// ============================================================================

/// Plain CRUD over the public site's content records. The only rule
/// beyond permissions is housekeeping: replacing or removing a record's
/// photo deletes the old blob, and a storage failure never blocks the
/// record mutation.
#[derive(Clone)]
pub struct ContentUseCases {
    repo: Arc<dyn ContentRepo>,
    files: Arc<dyn FileStore>,
}

impl ContentUseCases {
    pub fn new(repo: Arc<dyn ContentRepo>, files: Arc<dyn FileStore>) -> Self {
        Self { repo, files }
    }

    /// Active records only, for the public site.
    pub async fn public_list(&self, kind: ContentKind) -> AppResult<Vec<ContentRecord>> {
        self.repo.list(kind, true).await
    }

    #[instrument(skip(self))]
    pub async fn admin_list(&self, actor: &User, kind: ContentKind) -> AppResult<Vec<ContentRecord>> {
        self.require_content_manager(actor)?;
        self.repo.list(kind, false).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, actor: &User, kind: ContentKind, id: Uuid) -> AppResult<ContentRecord> {
        self.require_content_manager(actor)?;
        self.repo
            .find_by_id(kind, id)
            .await?
            .ok_or(AppError::NotFound)
    }

    #[instrument(skip(self, fields))]
    pub async fn create(
        &self,
        actor: &User,
        kind: ContentKind,
        fields: ContentFields,
    ) -> AppResult<ContentRecord> {
        self.require_content_manager(actor)?;
        validate_fields(&fields)?;

        let record = ContentRecord {
            id: Uuid::new_v4(),
            name: fields.name.trim().to_string(),
            description: fields.description,
            photo: fields.photo,
            is_active: fields.is_active,
            display_order: fields.display_order,
            created_at: None,
            updated_at: None,
        };
        self.repo.insert(kind, &record).await
    }

    #[instrument(skip(self, fields))]
    pub async fn update(
        &self,
        actor: &User,
        kind: ContentKind,
        id: Uuid,
        fields: ContentFields,
    ) -> AppResult<ContentRecord> {
        self.require_content_manager(actor)?;
        validate_fields(&fields)?;

        let mut record = self
            .repo
            .find_by_id(kind, id)
            .await?
            .ok_or(AppError::NotFound)?;

        let replaced_photo = match (&record.photo, &fields.photo) {
            (Some(old), new) if new.as_deref() != Some(old.as_str()) => Some(old.clone()),
            _ => None,
        };

        record.name = fields.name.trim().to_string();
        record.description = fields.description;
        record.photo = fields.photo;
        record.is_active = fields.is_active;
        record.display_order = fields.display_order;
        let record = self.repo.update(kind, &record).await?;

        if let Some(old) = replaced_photo {
            self.delete_blob_best_effort(&old).await;
        }
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, actor: &User, kind: ContentKind, id: Uuid) -> AppResult<()> {
        self.require_content_manager(actor)?;
        let record = self
            .repo
            .find_by_id(kind, id)
            .await?
            .ok_or(AppError::NotFound)?;
        self.repo.delete(kind, id).await?;

        if let Some(photo) = record.photo {
            self.delete_blob_best_effort(&photo).await;
        }
        Ok(())
    }

    /// Store an uploaded blob and hand back its reference for use in a
    /// subsequent create/update.
    #[instrument(skip(self, bytes))]
    pub async fn upload_media(
        &self,
        actor: &User,
        filename: &str,
        bytes: Vec<u8>,
    ) -> AppResult<String> {
        self.require_content_manager(actor)?;
        if bytes.is_empty() {
            return Err(AppError::validation("file", "Uploaded file is empty"));
        }
        self.files.store("content", filename, bytes).await
    }

    fn require_content_manager(&self, actor: &User) -> AppResult<()> {
        if !actor.can(Capability::ManageContent) {
            return Err(AppError::forbidden(
                "You do not have permission to manage site content",
            ));
        }
        Ok(())
    }

    async fn delete_blob_best_effort(&self, reference: &str) {
        if let Err(err) = self.files.delete(reference).await {
            warn!(error = %err, reference, "failed to delete stored file; continuing");
        }
    }
}

fn validate_fields(fields: &ContentFields) -> AppResult<()> {
    if !is_valid_name(&fields.name, 150) {
        return Err(AppError::validation(
            "name",
            "Name is required and must be at most 150 characters",
        ));
    }
    Ok(())
}
