//! Builds a complete `AppState` wired to in-memory mocks, for
//! router-level tests.

use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use url::Url;

use crate::adapters::http::app_state::AppState;
use crate::application::use_cases::applications::ApplicationsUseCases;
use crate::application::use_cases::auth::AuthUseCases;
use crate::application::use_cases::content::ContentUseCases;
use crate::application::use_cases::users::UsersUseCases;
use crate::application::use_cases::voices::VoicesUseCases;
use crate::infra::config::AppConfig;
use crate::test_utils::{
    CountingMembershipNumbers, InMemoryApplicationRepo, InMemoryContentRepo,
    InMemoryMagicLinkStore, InMemoryUserRepo, InMemoryVoiceRepo, NoopRateLimiter,
    RecordingEmailSender, RecordingFileStore,
};

pub struct TestState {
    pub state: AppState,
    pub users: Arc<InMemoryUserRepo>,
    pub applications: Arc<InMemoryApplicationRepo>,
    pub voices: Arc<InMemoryVoiceRepo>,
    pub content: Arc<InMemoryContentRepo>,
    pub email: Arc<RecordingEmailSender>,
    pub files: Arc<RecordingFileStore>,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: SecretString::new("test-secret-with-enough-entropy".into()),
        access_token_ttl: time::Duration::hours(1),
        refresh_token_ttl: time::Duration::days(30),
        app_origin: Url::parse("http://localhost:3000").unwrap(),
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
        magic_link_ttl_minutes: 15,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        redis_url: String::new(),
        rate_limit_window_secs: 60,
        rate_limit_per_ip: 1000,
        rate_limit_per_email: 1000,
        database_url: String::new(),
        trust_proxy: false,
        media_root: std::env::temp_dir().join("uplift-test-media"),
        resend_api_key: None,
        email_from: "Uplift <no-reply@uplift.test>".into(),
    }
}

pub fn build_test_state() -> TestState {
    let users = Arc::new(InMemoryUserRepo::new());
    let applications = Arc::new(InMemoryApplicationRepo::new());
    let voices = Arc::new(InMemoryVoiceRepo::new());
    let content = Arc::new(InMemoryContentRepo::new());
    let email = Arc::new(RecordingEmailSender::new());
    let files = Arc::new(RecordingFileStore::new());
    let magic_links = Arc::new(InMemoryMagicLinkStore::new());
    let config = Arc::new(test_config());

    let state = AppState {
        config: config.clone(),
        auth_use_cases: Arc::new(AuthUseCases::new(
            users.clone(),
            magic_links,
            email.clone(),
            config.app_origin.to_string(),
        )),
        users_use_cases: Arc::new(UsersUseCases::new(users.clone())),
        applications_use_cases: Arc::new(ApplicationsUseCases::new(
            applications.clone(),
            users.clone(),
            Arc::new(CountingMembershipNumbers::new()),
            email.clone(),
        )),
        voices_use_cases: Arc::new(VoicesUseCases::new(
            voices.clone(),
            users.clone(),
            email.clone(),
        )),
        content_use_cases: Arc::new(ContentUseCases::new(content.clone(), files.clone())),
        user_repo: users.clone(),
        rate_limiter: Arc::new(NoopRateLimiter),
    };

    TestState {
        state,
        users,
        applications,
        voices,
        content,
        email,
        files,
    }
}
