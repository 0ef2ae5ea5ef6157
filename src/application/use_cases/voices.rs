use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::app_error::{AppError, AppResult, FieldError};
use crate::application::use_cases::auth::EmailSender;
use crate::application::use_cases::users::UserRepo;
use crate::domain::entities::user::User;
use crate::domain::entities::voice::{VoiceMessage, VoiceStatus};
use crate::domain::permissions::Capability;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_MESSAGE_LEN: usize = 5000;

// ============================================================================
// Ports
// ============================================================================

#[async_trait]
pub trait VoiceRepo: Send + Sync {
    async fn insert(&self, message: &VoiceMessage) -> AppResult<VoiceMessage>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<VoiceMessage>>;
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<VoiceMessage>>;
    async fn list_by_status(&self, status: Option<VoiceStatus>) -> AppResult<Vec<VoiceMessage>>;
    /// Only rows satisfying the public-visibility predicate at `now`.
    async fn list_public(&self, now: NaiveDateTime) -> AppResult<Vec<VoiceMessage>>;
    async fn update(&self, message: &VoiceMessage) -> AppResult<VoiceMessage>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

// ============================================================================
// Use Cases
// ============================================================================

/// Voice-of-change moderation: any active user submits a message, admins
/// approve or reject it, and only approved-and-published messages reach
/// the public listing. Editing a pending or rejected message explicitly
/// re-enters the pending state and clears any prior publication.
#[derive(Clone)]
pub struct VoicesUseCases {
    repo: Arc<dyn VoiceRepo>,
    users: Arc<dyn UserRepo>,
    email: Arc<dyn EmailSender>,
}

impl VoicesUseCases {
    pub fn new(
        repo: Arc<dyn VoiceRepo>,
        users: Arc<dyn UserRepo>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self { repo, users, email }
    }

    #[instrument(skip(self, title, message))]
    pub async fn submit(&self, actor: &User, title: &str, message: &str) -> AppResult<VoiceMessage> {
        if !actor.can(Capability::SubmitVoiceMessages) {
            return Err(AppError::forbidden(
                "Only active accounts may submit voice-of-change messages",
            ));
        }
        validate_content(title, message)?;

        let record = VoiceMessage {
            id: Uuid::new_v4(),
            user_id: actor.id,
            title: title.trim().to_string(),
            message: message.trim().to_string(),
            status: VoiceStatus::Pending,
            admin_notes: None,
            published_online: false,
            published_at: None,
            created_at: None,
            updated_at: None,
        };
        self.repo.insert(&record).await
    }

    /// Owner edit. Always moves the message back to pending and clears
    /// publication state and prior moderation notes, so a rejected or
    /// still-pending message re-enters the moderation queue as new.
    #[instrument(skip(self, title, message))]
    pub async fn update(
        &self,
        actor: &User,
        message_id: Uuid,
        title: &str,
        message: &str,
    ) -> AppResult<VoiceMessage> {
        let mut record = self
            .repo
            .find_by_id(message_id)
            .await?
            .ok_or(AppError::NotFound)?;
        if record.user_id != actor.id {
            return Err(AppError::forbidden("You may only edit your own messages"));
        }
        if !record.status.is_owner_editable() {
            return Err(AppError::conflict(
                "Approved messages can no longer be edited; contact an administrator to unpublish first",
            ));
        }
        validate_content(title, message)?;

        record.title = title.trim().to_string();
        record.message = message.trim().to_string();
        record.status = VoiceStatus::Pending;
        record.admin_notes = None;
        record.published_online = false;
        record.published_at = None;
        self.repo.update(&record).await
    }

    /// Approval publishes immediately: the message goes online with the
    /// approval time as its publication timestamp.
    #[instrument(skip(self))]
    pub async fn approve(
        &self,
        actor: &User,
        message_id: Uuid,
        notes: Option<String>,
    ) -> AppResult<VoiceMessage> {
        self.require_moderator(actor)?;
        let mut record = self
            .repo
            .find_by_id(message_id)
            .await?
            .ok_or(AppError::NotFound)?;

        record.status = VoiceStatus::Approved;
        record.admin_notes = notes;
        record.published_online = true;
        record.published_at = Some(Utc::now().naive_utc());
        let record = self.repo.update(&record).await?;

        self.notify_owner(
            &record,
            "Your voice-of-change message was published",
            "<p>Your message has been approved and is now live.</p>",
        )
        .await;
        Ok(record)
    }

    /// Rejection always carries a reason for the author.
    #[instrument(skip(self, notes))]
    pub async fn reject(
        &self,
        actor: &User,
        message_id: Uuid,
        notes: &str,
    ) -> AppResult<VoiceMessage> {
        self.require_moderator(actor)?;
        if notes.trim().is_empty() {
            return Err(AppError::validation(
                "admin_notes",
                "A rejection reason is required",
            ));
        }
        let mut record = self
            .repo
            .find_by_id(message_id)
            .await?
            .ok_or(AppError::NotFound)?;

        record.status = VoiceStatus::Rejected;
        record.admin_notes = Some(notes.trim().to_string());
        record.published_online = false;
        record.published_at = None;
        let record = self.repo.update(&record).await?;

        self.notify_owner(
            &record,
            "Your voice-of-change message was not approved",
            "<p>Your message was not approved. See the moderator notes in your account.</p>",
        )
        .await;
        Ok(record)
    }

    /// Takes an approved message offline. The status stays approved;
    /// only the publication flags are cleared.
    #[instrument(skip(self))]
    pub async fn unpublish(&self, actor: &User, message_id: Uuid) -> AppResult<VoiceMessage> {
        self.require_moderator(actor)?;
        let mut record = self
            .repo
            .find_by_id(message_id)
            .await?
            .ok_or(AppError::NotFound)?;

        record.published_online = false;
        record.published_at = None;
        self.repo.update(&record).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, actor: &User, message_id: Uuid) -> AppResult<()> {
        let record = self
            .repo
            .find_by_id(message_id)
            .await?
            .ok_or(AppError::NotFound)?;
        if record.user_id != actor.id {
            return Err(AppError::forbidden("You may only delete your own messages"));
        }
        if !record.status.is_owner_editable() {
            return Err(AppError::conflict(
                "Approved messages can no longer be deleted",
            ));
        }
        self.repo.delete(record.id).await
    }

    pub async fn list_mine(&self, actor: &User) -> AppResult<Vec<VoiceMessage>> {
        self.repo.list_for_user(actor.id).await
    }

    pub async fn admin_list(
        &self,
        actor: &User,
        status: Option<VoiceStatus>,
    ) -> AppResult<Vec<VoiceMessage>> {
        self.require_moderator(actor)?;
        self.repo.list_by_status(status).await
    }

    /// The public feed: approved, switched online, publication time
    /// passed.
    pub async fn list_public(&self) -> AppResult<Vec<VoiceMessage>> {
        let now = Utc::now().naive_utc();
        let rows = self.repo.list_public(now).await?;
        // The repo already filters; keep the predicate authoritative
        // in case an adapter is loose about the timestamp comparison.
        Ok(rows
            .into_iter()
            .filter(|m| m.is_publicly_visible(now))
            .collect())
    }

    fn require_moderator(&self, actor: &User) -> AppResult<()> {
        if !actor.can(Capability::ApproveVoiceMessages) {
            return Err(AppError::forbidden(
                "Only administrators may moderate voice-of-change messages",
            ));
        }
        Ok(())
    }

    async fn notify_owner(&self, record: &VoiceMessage, subject: &str, html: &str) {
        let owner = match self.users.find_by_id(record.user_id).await {
            Ok(Some(owner)) => owner,
            Ok(None) => return,
            Err(err) => {
                warn!(error = %err, "failed to load message owner for notification");
                return;
            }
        };
        if let Err(err) = self.email.send(&owner.email, subject, html).await {
            warn!(error = %err, "failed to send moderation notification");
        }
    }
}

fn validate_content(title: &str, message: &str) -> AppResult<()> {
    let mut errors = Vec::new();
    if title.trim().is_empty() || title.trim().chars().count() > MAX_TITLE_LEN {
        errors.push(FieldError {
            field: "title".into(),
            message: format!("Title is required and must be at most {MAX_TITLE_LEN} characters"),
        });
    }
    if message.trim().is_empty() || message.trim().chars().count() > MAX_MESSAGE_LEN {
        errors.push(FieldError {
            field: "message".into(),
            message: format!(
                "Message is required and must be at most {MAX_MESSAGE_LEN} characters"
            ),
        });
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}
