use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult, FieldError};
use crate::application::validators::{is_valid_email, is_valid_name, is_valid_phone};
use crate::domain::entities::user::{User, UserStatus, UserType};
use crate::domain::permissions::Capability;

// ============================================================================
// Ports
// ============================================================================

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn insert(&self, user: &User) -> AppResult<User>;
    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn list(&self) -> AppResult<Vec<User>>;
    async fn update_profile(&self, user_id: Uuid, fields: &ProfileFields) -> AppResult<User>;
    /// Admin-side mutation of role and standing.
    async fn update_standing(
        &self,
        user_id: Uuid,
        user_type: UserType,
        status: UserStatus,
        is_active: bool,
    ) -> AppResult<User>;
    async fn set_membership_number(&self, user_id: Uuid, number: &str) -> AppResult<()>;
}

/// Atomic, persistence-backed sequence. Never derived from a row count:
/// concurrent callers must each observe a distinct, increasing value.
#[async_trait]
pub trait MembershipNumbers: Send + Sync {
    async fn next(&self) -> AppResult<i64>;
}

/// `MB` + 5-digit zero-padded counter. Values past 99999 keep all their
/// digits (`MB100000`), they are never truncated.
pub fn format_membership_number(value: i64) -> String {
    format!("MB{value:05}")
}

// ============================================================================
// Inputs
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub designation: Option<String>,
    pub profile_photo: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
}

pub(crate) fn validate_register_input(input: &RegisterInput) -> AppResult<()> {
    let mut errors = Vec::new();
    if !is_valid_name(&input.name, 100) {
        errors.push(FieldError {
            field: "name".into(),
            message: "Name is required and must be at most 100 characters".into(),
        });
    }
    if !is_valid_email(&input.email) {
        errors.push(FieldError {
            field: "email".into(),
            message: "A valid email address is required".into(),
        });
    }
    if let Some(phone) = input.phone.as_deref()
        && !is_valid_phone(phone)
    {
        errors.push(FieldError {
            field: "phone".into(),
            message: "Phone number is not valid".into(),
        });
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct UsersUseCases {
    repo: Arc<dyn UserRepo>,
}

impl UsersUseCases {
    pub fn new(repo: Arc<dyn UserRepo>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, user_id: Uuid) -> AppResult<User> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Self-service profile update. Role and standing are admin-only and
    /// go through `admin_update_standing`.
    #[instrument(skip(self, fields))]
    pub async fn update_profile(&self, actor: &User, fields: ProfileFields) -> AppResult<User> {
        let mut errors = Vec::new();
        if !is_valid_name(&fields.name, 100) {
            errors.push(FieldError {
                field: "name".into(),
                message: "Name is required and must be at most 100 characters".into(),
            });
        }
        if let Some(phone) = fields.phone.as_deref()
            && !is_valid_phone(phone)
        {
            errors.push(FieldError {
                field: "phone".into(),
                message: "Phone number is not valid".into(),
            });
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        self.repo.update_profile(actor.id, &fields).await
    }

    #[instrument(skip(self))]
    pub async fn admin_list(&self, actor: &User) -> AppResult<Vec<User>> {
        self.require_user_manager(actor)?;
        self.repo.list().await
    }

    #[instrument(skip(self))]
    pub async fn admin_get(&self, actor: &User, user_id: Uuid) -> AppResult<User> {
        self.require_user_manager(actor)?;
        self.get(user_id).await
    }

    /// Admin creation uses the same defaults as self-registration:
    /// guests start active.
    #[instrument(skip(self, input))]
    pub async fn admin_create(&self, actor: &User, input: RegisterInput) -> AppResult<User> {
        self.require_user_manager(actor)?;
        validate_register_input(&input)?;

        let email = input.email.trim().to_lowercase();
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::validation("email", "Email is already registered"));
        }

        let user = new_guest(&input, &email);
        self.repo.insert(&user).await
    }

    #[instrument(skip(self))]
    pub async fn admin_update_standing(
        &self,
        actor: &User,
        user_id: Uuid,
        user_type: UserType,
        status: UserStatus,
        is_active: bool,
    ) -> AppResult<User> {
        self.require_user_manager(actor)?;
        // Ensure the target exists so a bad id reports NotFound, not a
        // silent zero-row update.
        self.get(user_id).await?;
        self.repo
            .update_standing(user_id, user_type, status, is_active)
            .await
    }

    fn require_user_manager(&self, actor: &User) -> AppResult<()> {
        if !actor.can(Capability::ManageUsers) {
            return Err(AppError::forbidden(
                "Only administrators may manage user accounts",
            ));
        }
        Ok(())
    }
}

/// Build a fresh guest account from validated registration input.
pub(crate) fn new_guest(input: &RegisterInput, email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        name: input.name.trim().to_string(),
        email: email.to_string(),
        user_type: UserType::Guest,
        status: UserStatus::Active,
        is_active: true,
        membership_number: None,
        phone: input.phone.clone(),
        address: input.address.clone(),
        date_of_birth: input.date_of_birth,
        gender: input.gender.clone(),
        designation: None,
        profile_photo: None,
        created_at: None,
        updated_at: None,
    }
}
