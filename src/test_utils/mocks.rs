//! In-memory mock implementations of the repository and collaborator
//! ports.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::use_cases::applications::ApplicationRepo;
use crate::application::use_cases::auth::{EmailSender, MagicLinkStore};
use crate::application::use_cases::content::{ContentRepo, FileStore};
use crate::application::use_cases::users::{MembershipNumbers, ProfileFields, UserRepo};
use crate::application::use_cases::voices::VoiceRepo;
use crate::domain::entities::application::{ApplicationStatus, MembershipApplication};
use crate::domain::entities::content::{ContentKind, ContentRecord};
use crate::domain::entities::user::{User, UserStatus, UserType};
use crate::domain::entities::voice::{VoiceMessage, VoiceStatus};
use crate::infra::rate_limit::RateLimiterTrait;

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

// ============================================================================
// Users
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepo {
    pub users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert directly, bypassing use-case validation.
    pub fn seed(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn insert(&self, user: &User) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::validation("email", "Email is already registered"));
        }
        let mut stored = user.clone();
        stored.created_at = Some(now());
        stored.updated_at = Some(now());
        users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn update_profile(&self, user_id: Uuid, fields: &ProfileFields) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&user_id).ok_or(AppError::NotFound)?;
        user.name = fields.name.trim().to_string();
        user.phone = fields.phone.clone();
        user.address = fields.address.clone();
        user.date_of_birth = fields.date_of_birth;
        user.gender = fields.gender.clone();
        user.designation = fields.designation.clone();
        user.profile_photo = fields.profile_photo.clone();
        user.updated_at = Some(now());
        Ok(user.clone())
    }

    async fn update_standing(
        &self,
        user_id: Uuid,
        user_type: UserType,
        status: UserStatus,
        is_active: bool,
    ) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&user_id).ok_or(AppError::NotFound)?;
        user.user_type = user_type;
        user.status = status;
        user.is_active = is_active;
        user.updated_at = Some(now());
        Ok(user.clone())
    }

    async fn set_membership_number(&self, user_id: Uuid, number: &str) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&user_id).ok_or(AppError::NotFound)?;
        user.membership_number = Some(number.to_string());
        Ok(())
    }
}

// ============================================================================
// Applications
// ============================================================================

#[derive(Default)]
pub struct InMemoryApplicationRepo {
    pub applications: Mutex<HashMap<Uuid, MembershipApplication>>,
}

impl InMemoryApplicationRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, application: MembershipApplication) {
        self.applications
            .lock()
            .unwrap()
            .insert(application.id, application);
    }
}

#[async_trait]
impl ApplicationRepo for InMemoryApplicationRepo {
    async fn insert(
        &self,
        application: &MembershipApplication,
    ) -> AppResult<MembershipApplication> {
        let mut applications = self.applications.lock().unwrap();
        // Mirror the partial unique index on (user_id) WHERE pending.
        if applications
            .values()
            .any(|a| a.user_id == application.user_id && a.status == ApplicationStatus::Pending)
        {
            return Err(AppError::conflict(
                "A pending application already exists for this account",
            ));
        }
        let mut stored = application.clone();
        stored.created_at = Some(now());
        stored.updated_at = Some(now());
        applications.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MembershipApplication>> {
        Ok(self.applications.lock().unwrap().get(&id).cloned())
    }

    async fn find_pending_for_user(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<MembershipApplication>> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .values()
            .find(|a| a.user_id == user_id && a.status == ApplicationStatus::Pending)
            .cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<MembershipApplication>> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_by_status(
        &self,
        status: Option<ApplicationStatus>,
    ) -> AppResult<Vec<MembershipApplication>> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .values()
            .filter(|a| status.is_none_or(|s| a.status == s))
            .cloned()
            .collect())
    }

    async fn mark_processed(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        admin_notes: Option<String>,
        processed_by: Uuid,
        processed_at: NaiveDateTime,
    ) -> AppResult<Option<MembershipApplication>> {
        let mut applications = self.applications.lock().unwrap();
        let Some(stored) = applications.get_mut(&id) else {
            return Ok(None);
        };
        if stored.status != ApplicationStatus::Pending {
            return Ok(None);
        }
        stored.status = status;
        stored.admin_notes = admin_notes;
        stored.processed_by = Some(processed_by);
        stored.processed_at = Some(processed_at);
        stored.updated_at = Some(now());
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.applications
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or(AppError::NotFound)?;
        Ok(())
    }
}

// ============================================================================
// Voice messages
// ============================================================================

#[derive(Default)]
pub struct InMemoryVoiceRepo {
    pub messages: Mutex<HashMap<Uuid, VoiceMessage>>,
}

impl InMemoryVoiceRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, message: VoiceMessage) {
        self.messages.lock().unwrap().insert(message.id, message);
    }
}

#[async_trait]
impl VoiceRepo for InMemoryVoiceRepo {
    async fn insert(&self, message: &VoiceMessage) -> AppResult<VoiceMessage> {
        let mut stored = message.clone();
        stored.created_at = Some(now());
        stored.updated_at = Some(now());
        self.messages
            .lock()
            .unwrap()
            .insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<VoiceMessage>> {
        Ok(self.messages.lock().unwrap().get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<VoiceMessage>> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_by_status(&self, status: Option<VoiceStatus>) -> AppResult<Vec<VoiceMessage>> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .values()
            .filter(|m| status.is_none_or(|s| m.status == s))
            .cloned()
            .collect())
    }

    async fn list_public(&self, now: NaiveDateTime) -> AppResult<Vec<VoiceMessage>> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .values()
            .filter(|m| m.is_publicly_visible(now))
            .cloned()
            .collect())
    }

    async fn update(&self, message: &VoiceMessage) -> AppResult<VoiceMessage> {
        let mut messages = self.messages.lock().unwrap();
        if !messages.contains_key(&message.id) {
            return Err(AppError::NotFound);
        }
        let mut stored = message.clone();
        stored.updated_at = Some(now());
        messages.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.messages
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or(AppError::NotFound)?;
        Ok(())
    }
}

// ============================================================================
// Content
// ============================================================================

#[derive(Default)]
pub struct InMemoryContentRepo {
    pub records: Mutex<HashMap<(ContentKind, Uuid), ContentRecord>>,
}

impl InMemoryContentRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, kind: ContentKind, record: ContentRecord) {
        self.records
            .lock()
            .unwrap()
            .insert((kind, record.id), record);
    }
}

#[async_trait]
impl ContentRepo for InMemoryContentRepo {
    async fn insert(&self, kind: ContentKind, record: &ContentRecord) -> AppResult<ContentRecord> {
        let mut stored = record.clone();
        stored.created_at = Some(now());
        stored.updated_at = Some(now());
        self.records
            .lock()
            .unwrap()
            .insert((kind, stored.id), stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, kind: ContentKind, id: Uuid) -> AppResult<Option<ContentRecord>> {
        Ok(self.records.lock().unwrap().get(&(kind, id)).cloned())
    }

    async fn list(&self, kind: ContentKind, only_active: bool) -> AppResult<Vec<ContentRecord>> {
        let mut records: Vec<ContentRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|((k, _), r)| *k == kind && (!only_active || r.is_active))
            .map(|(_, r)| r.clone())
            .collect();
        records.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(records)
    }

    async fn update(&self, kind: ContentKind, record: &ContentRecord) -> AppResult<ContentRecord> {
        let mut records = self.records.lock().unwrap();
        if !records.contains_key(&(kind, record.id)) {
            return Err(AppError::NotFound);
        }
        let mut stored = record.clone();
        stored.updated_at = Some(now());
        records.insert((kind, stored.id), stored.clone());
        Ok(stored)
    }

    async fn delete(&self, kind: ContentKind, id: Uuid) -> AppResult<()> {
        self.records
            .lock()
            .unwrap()
            .remove(&(kind, id))
            .ok_or(AppError::NotFound)?;
        Ok(())
    }
}

// ============================================================================
// Collaborators
// ============================================================================

/// Monotonic in-memory sequence.
#[derive(Default)]
pub struct CountingMembershipNumbers {
    counter: AtomicI64,
}

impl CountingMembershipNumbers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(value: i64) -> Self {
        Self {
            counter: AtomicI64::new(value - 1),
        }
    }
}

#[async_trait]
impl MembershipNumbers for CountingMembershipNumbers {
    async fn next(&self) -> AppResult<i64> {
        Ok(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Records outgoing mail for assertions.
#[derive(Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<SentEmail>>,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: html.to_string(),
        });
        Ok(())
    }
}

/// Magic link store that ignores TTLs.
#[derive(Default)]
pub struct InMemoryMagicLinkStore {
    links: Mutex<HashMap<String, Uuid>>,
}

impl InMemoryMagicLinkStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MagicLinkStore for InMemoryMagicLinkStore {
    async fn save(&self, token_hash: &str, user_id: Uuid, _ttl_minutes: i64) -> AppResult<()> {
        self.links
            .lock()
            .unwrap()
            .insert(token_hash.to_string(), user_id);
        Ok(())
    }

    async fn consume(&self, token_hash: &str) -> AppResult<Option<Uuid>> {
        Ok(self.links.lock().unwrap().remove(token_hash))
    }
}

/// File store that records stores and deletions without touching disk.
#[derive(Default)]
pub struct RecordingFileStore {
    stored: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
}

impl RecordingFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(&self) -> Vec<String> {
        self.stored.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileStore for RecordingFileStore {
    async fn store(&self, folder: &str, filename: &str, _bytes: Vec<u8>) -> AppResult<String> {
        let reference = format!("{folder}/{filename}");
        self.stored.lock().unwrap().push(reference.clone());
        Ok(reference)
    }

    async fn delete(&self, reference: &str) -> AppResult<()> {
        self.deleted.lock().unwrap().push(reference.to_string());
        Ok(())
    }
}

/// File store whose every operation fails, for best-effort paths.
pub struct FailingFileStore;

#[async_trait]
impl FileStore for FailingFileStore {
    async fn store(&self, _folder: &str, _filename: &str, _bytes: Vec<u8>) -> AppResult<String> {
        Err(AppError::Internal("storage unavailable".into()))
    }

    async fn delete(&self, _reference: &str) -> AppResult<()> {
        Err(AppError::Internal("storage unavailable".into()))
    }
}

/// Rate limiter that always allows, for router tests.
pub struct NoopRateLimiter;

#[async_trait]
impl RateLimiterTrait for NoopRateLimiter {
    async fn check(&self, _ip: &str, _email: Option<&str>) -> AppResult<()> {
        Ok(())
    }
}
