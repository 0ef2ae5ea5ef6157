use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::use_cases::auth::EmailSender;
use crate::application::use_cases::users::{
    MembershipNumbers, UserRepo, format_membership_number,
};
use crate::domain::entities::application::{ApplicationStatus, MembershipApplication};
use crate::domain::entities::user::{User, UserStatus, UserType};
use crate::domain::permissions::Capability;

// ============================================================================
// Ports
// ============================================================================

#[async_trait]
pub trait ApplicationRepo: Send + Sync {
    /// Insert a new pending application. Implementations must enforce
    /// the one-pending-per-user invariant atomically (the Postgres
    /// adapter backs it with a partial unique index) and surface a
    /// violation as `StateConflict`.
    async fn insert(&self, application: &MembershipApplication)
    -> AppResult<MembershipApplication>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MembershipApplication>>;
    async fn find_pending_for_user(&self, user_id: Uuid)
    -> AppResult<Option<MembershipApplication>>;
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<MembershipApplication>>;
    async fn list_by_status(
        &self,
        status: Option<ApplicationStatus>,
    ) -> AppResult<Vec<MembershipApplication>>;
    /// Atomically move a still-pending application to a terminal status.
    /// Returns None when the row was no longer pending, so concurrent
    /// admins racing on the same application resolve deterministically:
    /// exactly one wins.
    async fn mark_processed(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        admin_notes: Option<String>,
        processed_by: Uuid,
        processed_at: chrono::NaiveDateTime,
    ) -> AppResult<Option<MembershipApplication>>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

// ============================================================================
// Use Cases
// ============================================================================

/// The membership application workflow: a guest submits a request to
/// become a member, volunteer or intern; an admin approves or rejects
/// it. Approved and rejected are terminal; re-applying creates a new
/// record once no pending one exists.
#[derive(Clone)]
pub struct ApplicationsUseCases {
    repo: Arc<dyn ApplicationRepo>,
    users: Arc<dyn UserRepo>,
    numbers: Arc<dyn MembershipNumbers>,
    email: Arc<dyn EmailSender>,
}

impl ApplicationsUseCases {
    pub fn new(
        repo: Arc<dyn ApplicationRepo>,
        users: Arc<dyn UserRepo>,
        numbers: Arc<dyn MembershipNumbers>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            repo,
            users,
            numbers,
            email,
        }
    }

    #[instrument(skip(self, application_data))]
    pub async fn submit(
        &self,
        actor: &User,
        requested_user_type: UserType,
        application_data: serde_json::Value,
    ) -> AppResult<MembershipApplication> {
        if !actor.can(Capability::ApplyForMembership) {
            return Err(AppError::forbidden(
                "Only active guest accounts may apply for membership",
            ));
        }
        if !requested_user_type.is_applicable() {
            return Err(AppError::validation(
                "requested_user_type",
                "Applications may only request member, volunteer or intern",
            ));
        }
        if !application_data.is_object() {
            return Err(AppError::validation(
                "application_data",
                "Application data must be a key/value object",
            ));
        }
        if self.repo.find_pending_for_user(actor.id).await?.is_some() {
            return Err(AppError::conflict(
                "A pending application already exists for this account; wait for it to be processed or cancel it first",
            ));
        }

        let application = MembershipApplication {
            id: Uuid::new_v4(),
            user_id: actor.id,
            requested_user_type,
            application_data,
            status: ApplicationStatus::Pending,
            admin_notes: None,
            processed_by: None,
            processed_at: None,
            created_at: None,
            updated_at: None,
        };
        self.repo.insert(&application).await
    }

    /// Approve a pending application and elevate the applicant: the
    /// requested type becomes their `user_type`, their account is made
    /// active, and a membership number is assigned if they lack one.
    #[instrument(skip(self))]
    pub async fn approve(
        &self,
        actor: &User,
        application_id: Uuid,
        notes: Option<String>,
    ) -> AppResult<MembershipApplication> {
        let application = self
            .process(actor, application_id, ApplicationStatus::Approved, notes)
            .await?;

        let applicant = self
            .users
            .find_by_id(application.user_id)
            .await?
            .ok_or(AppError::NotFound)?;
        self.users
            .update_standing(
                applicant.id,
                application.requested_user_type,
                UserStatus::Active,
                true,
            )
            .await?;
        if applicant.membership_number.is_none() {
            let number = format_membership_number(self.numbers.next().await?);
            self.users
                .set_membership_number(applicant.id, &number)
                .await?;
        }

        self.notify(
            &applicant.email,
            "Your membership application was approved",
            &format!(
                "<p>Welcome! Your application to join as {} has been approved.</p>",
                application.requested_user_type.label()
            ),
        )
        .await;

        Ok(application)
    }

    /// Reject a pending application. The applicant's account is left
    /// untouched.
    #[instrument(skip(self))]
    pub async fn reject(
        &self,
        actor: &User,
        application_id: Uuid,
        notes: Option<String>,
    ) -> AppResult<MembershipApplication> {
        let application = self
            .process(actor, application_id, ApplicationStatus::Rejected, notes)
            .await?;

        if let Some(applicant) = self.users.find_by_id(application.user_id).await? {
            self.notify(
                &applicant.email,
                "Your membership application was not approved",
                "<p>Unfortunately your membership application was not approved this time.</p>",
            )
            .await;
        }

        Ok(application)
    }

    /// Owners may withdraw an application while it is still pending.
    #[instrument(skip(self))]
    pub async fn cancel(&self, actor: &User, application_id: Uuid) -> AppResult<()> {
        let application = self
            .repo
            .find_by_id(application_id)
            .await?
            .ok_or(AppError::NotFound)?;
        if application.user_id != actor.id {
            return Err(AppError::forbidden(
                "You may only cancel your own application",
            ));
        }
        if application.status != ApplicationStatus::Pending {
            return Err(AppError::conflict(
                "Only pending applications can be cancelled; this one has already been processed",
            ));
        }
        self.repo.delete(application.id).await
    }

    /// Owner-or-admin read.
    pub async fn get(&self, actor: &User, application_id: Uuid) -> AppResult<MembershipApplication> {
        let application = self
            .repo
            .find_by_id(application_id)
            .await?
            .ok_or(AppError::NotFound)?;
        if application.user_id != actor.id && !actor.is_admin() {
            return Err(AppError::forbidden(
                "You may only view your own applications",
            ));
        }
        Ok(application)
    }

    pub async fn list_mine(&self, actor: &User) -> AppResult<Vec<MembershipApplication>> {
        self.repo.list_for_user(actor.id).await
    }

    pub async fn admin_list(
        &self,
        actor: &User,
        status: Option<ApplicationStatus>,
    ) -> AppResult<Vec<MembershipApplication>> {
        if !actor.can(Capability::ApproveApplications) {
            return Err(AppError::forbidden(
                "Only administrators may review applications",
            ));
        }
        self.repo.list_by_status(status).await
    }

    /// Shared approve/reject path: admin capability, existence, then an
    /// atomic pending-to-terminal transition in the repo.
    async fn process(
        &self,
        actor: &User,
        application_id: Uuid,
        target: ApplicationStatus,
        notes: Option<String>,
    ) -> AppResult<MembershipApplication> {
        if !actor.can(Capability::ApproveApplications) {
            return Err(AppError::forbidden(
                "Only administrators may process applications",
            ));
        }
        let application = self
            .repo
            .find_by_id(application_id)
            .await?
            .ok_or(AppError::NotFound)?;
        if !application.status.can_transition_to(target) {
            return Err(AppError::conflict(&format!(
                "Application has already been {}; only pending applications can be processed",
                application.status
            )));
        }
        // The conditional write closes the gap between the check above
        // and the transition: a concurrent processor leaves None here.
        self.repo
            .mark_processed(
                application.id,
                target,
                notes,
                actor.id,
                Utc::now().naive_utc(),
            )
            .await?
            .ok_or_else(|| {
                AppError::conflict("Application was processed by someone else in the meantime")
            })
    }

    /// Notification delivery never blocks the workflow.
    async fn notify(&self, to: &str, subject: &str, html: &str) {
        if let Err(err) = self.email.send(to, subject, html).await {
            warn!(error = %err, "failed to send application notification");
        }
    }
}
