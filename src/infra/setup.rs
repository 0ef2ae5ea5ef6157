use std::fs::File;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::adapters::email::resend::{LogEmailSender, ResendEmailSender};
use crate::adapters::http::app_state::AppState;
use crate::adapters::storage::local::LocalFileStore;
use crate::application::use_cases::applications::{ApplicationRepo, ApplicationsUseCases};
use crate::application::use_cases::auth::{AuthUseCases, EmailSender};
use crate::application::use_cases::content::{ContentRepo, ContentUseCases, FileStore};
use crate::application::use_cases::users::{MembershipNumbers, UserRepo, UsersUseCases};
use crate::application::use_cases::voices::{VoiceRepo, VoicesUseCases};
use crate::infra::config::AppConfig;
use crate::infra::magic_links::RedisMagicLinkStore;
use crate::infra::postgres_persistence;
use crate::infra::rate_limit::{RateLimiterTrait, RedisRateLimiter};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let postgres_arc = Arc::new(postgres_persistence(&config.database_url).await?);

    let rate_limiter: Arc<dyn RateLimiterTrait> = Arc::new(
        RedisRateLimiter::new(
            &config.redis_url,
            config.rate_limit_window_secs,
            config.rate_limit_per_ip,
            config.rate_limit_per_email,
        )
        .await?,
    );

    let magic_links = Arc::new(RedisMagicLinkStore::new(&config.redis_url).await?);

    let email: Arc<dyn EmailSender> = match &config.resend_api_key {
        Some(api_key) => Arc::new(ResendEmailSender::new(
            api_key.clone(),
            config.email_from.clone(),
        )),
        None => Arc::new(LogEmailSender),
    };

    let files: Arc<dyn FileStore> = Arc::new(LocalFileStore::new(config.media_root.clone()));

    let user_repo = postgres_arc.clone() as Arc<dyn UserRepo>;
    let application_repo = postgres_arc.clone() as Arc<dyn ApplicationRepo>;
    let voice_repo = postgres_arc.clone() as Arc<dyn VoiceRepo>;
    let content_repo = postgres_arc.clone() as Arc<dyn ContentRepo>;
    let membership_numbers = postgres_arc.clone() as Arc<dyn MembershipNumbers>;

    let auth_use_cases = AuthUseCases::new(
        user_repo.clone(),
        magic_links,
        email.clone(),
        config.app_origin.to_string(),
    );
    let users_use_cases = UsersUseCases::new(user_repo.clone());
    let applications_use_cases = ApplicationsUseCases::new(
        application_repo,
        user_repo.clone(),
        membership_numbers,
        email.clone(),
    );
    let voices_use_cases = VoicesUseCases::new(voice_repo, user_repo.clone(), email);
    let content_use_cases = ContentUseCases::new(content_repo, files);

    Ok(AppState {
        config: Arc::new(config),
        auth_use_cases: Arc::new(auth_use_cases),
        users_use_cases: Arc::new(users_use_cases),
        applications_use_cases: Arc::new(applications_use_cases),
        voices_use_cases: Arc::new(voices_use_cases),
        content_use_cases: Arc::new(content_use_cases),
        user_repo,
        rate_limiter,
    })
}

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "uplift=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs)
    let file = File::create("app.log").expect("cannot create log file");
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
