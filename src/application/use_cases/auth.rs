use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::use_cases::users::{
    RegisterInput, UserRepo, new_guest, validate_register_input,
};
use crate::domain::entities::user::User;

// ============================================================================
// Ports
// ============================================================================

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()>;
}

#[async_trait]
pub trait MagicLinkStore: Send + Sync {
    async fn save(&self, token_hash: &str, user_id: Uuid, ttl_minutes: i64) -> AppResult<()>;
    async fn consume(&self, token_hash: &str) -> AppResult<Option<Uuid>>;
}

// ============================================================================
// Use Cases
// ============================================================================

/// Passwordless signup and login. Registration creates a guest account;
/// login mails a one-time link whose hash lives in the link store until
/// consumed.
#[derive(Clone)]
pub struct AuthUseCases {
    repo: Arc<dyn UserRepo>,
    magic_links: Arc<dyn MagicLinkStore>,
    email: Arc<dyn EmailSender>,
    app_origin: String,
}

impl AuthUseCases {
    pub fn new(
        repo: Arc<dyn UserRepo>,
        magic_links: Arc<dyn MagicLinkStore>,
        email: Arc<dyn EmailSender>,
        app_origin: String,
    ) -> Self {
        Self {
            repo,
            magic_links,
            email,
            app_origin,
        }
    }

    /// Create a guest account. New users always start as active guests;
    /// elevation goes through the membership application workflow.
    #[instrument(skip(self, input))]
    pub async fn register(&self, input: RegisterInput) -> AppResult<User> {
        validate_register_input(&input)?;

        let email = input.email.trim().to_lowercase();
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::validation("email", "Email is already registered"));
        }

        let user = new_guest(&input, &email);
        self.repo.insert(&user).await
    }

    /// Mail a login link. Unknown addresses are not reported to the
    /// caller; the response is identical either way.
    #[instrument(skip(self))]
    pub async fn request_magic_link(&self, email: &str, ttl_minutes: i64) -> AppResult<()> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.repo.find_by_email(&email).await? else {
            debug!("magic link requested for unknown email");
            return Ok(());
        };

        let raw = generate_token();
        let token_hash = hash_token(&raw);
        self.magic_links
            .save(&token_hash, user.id, ttl_minutes)
            .await?;
        let link = format!("{}/magic?token={}", self.app_origin, raw);
        self.email
            .send(
                &email,
                "Your Uplift login link",
                &format!("<a href=\"{link}\">Sign in to Uplift</a>"),
            )
            .await
    }

    #[instrument(skip(self, raw_token))]
    pub async fn consume_magic_link(&self, raw_token: &str) -> AppResult<Option<Uuid>> {
        let token_hash = hash_token(raw_token);
        self.magic_links.consume(&token_hash).await
    }
}

fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn hash_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}
