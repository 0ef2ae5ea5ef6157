use std::sync::Arc;

use crate::application::use_cases::applications::ApplicationsUseCases;
use crate::application::use_cases::auth::AuthUseCases;
use crate::application::use_cases::content::ContentUseCases;
use crate::application::use_cases::users::{UserRepo, UsersUseCases};
use crate::application::use_cases::voices::VoicesUseCases;
use crate::infra::config::AppConfig;
use crate::infra::rate_limit::RateLimiterTrait;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_use_cases: Arc<AuthUseCases>,
    pub users_use_cases: Arc<UsersUseCases>,
    pub applications_use_cases: Arc<ApplicationsUseCases>,
    pub voices_use_cases: Arc<VoicesUseCases>,
    pub content_use_cases: Arc<ContentUseCases>,
    pub user_repo: Arc<dyn UserRepo>,
    pub rate_limiter: Arc<dyn RateLimiterTrait>,
}
