//! HuddleUp application composition root
//!
//! Composes all domain routers into a single application.

use std::sync::Arc;

use axum::{http::HeaderValue, Router};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
};

use huddleup_auth::{AuthBackend, AuthConfig};
use huddleup_chat::{ChatState, MessageRepository};
use huddleup_common::{config::Config, RealtimeHub};
use huddleup_email::{EmailConfig, EmailService, EmailServiceFactory, RelayState};
use huddleup_matches::{MatchesRepositories, MatchesState};
use huddleup_teams::{TeamsRepositories, TeamsState};

/// Largest accepted request body
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Apply pending database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Create the main application router with the email service from the environment
pub async fn create_app(config: &Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    let email_config = EmailConfig::from_env()?;
    let email_service = EmailServiceFactory::create(email_config)?;

    Ok(create_app_with_email(config, pool, Arc::from(email_service)))
}

/// Create the main application router with all routes
pub fn create_app_with_email(
    config: &Config,
    pool: PgPool,
    email: Arc<dyn EmailService>,
) -> Router {
    create_app_with_services(config, pool, email, RealtimeHub::default())
}

/// Create the router around an existing realtime hub, so callers can
/// publish into the same channels the streams read from
pub fn create_app_with_services(
    config: &Config,
    pool: PgPool,
    email: Arc<dyn EmailService>,
    realtime: RealtimeHub,
) -> Router {
    let auth = AuthBackend::new(
        pool.clone(),
        AuthConfig {
            jwt_secret: config.jwt_secret.clone(),
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
        },
    );
    let teams_repos = TeamsRepositories::new(pool.clone());

    let teams_state = TeamsState {
        repos: teams_repos.clone(),
        auth: auth.clone(),
        email: email.clone(),
        realtime: realtime.clone(),
    };

    let matches_state = MatchesState {
        repos: MatchesRepositories::new(pool.clone()),
        teams: teams_repos.clone(),
        auth: auth.clone(),
    };

    let chat_state = ChatState {
        messages: MessageRepository::new(pool),
        teams: teams_repos,
        auth,
        realtime,
    };

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { concat!("HuddleUp API v", env!("CARGO_PKG_VERSION")) }),
        )
        .merge(huddleup_teams::routes().with_state(teams_state))
        .merge(huddleup_matches::routes().with_state(matches_state))
        .merge(huddleup_chat::routes().with_state(chat_state))
        .merge(relay_app(email))
}

/// The mail relay on its own
pub fn relay_app(email: Arc<dyn EmailService>) -> Router {
    huddleup_email::relay::routes().with_state(RelayState::new(email))
}

/// CORS from a comma separated origin list; `*` allows any origin
pub fn build_cors_layer(origins: &str) -> CorsLayer {
    let origins = origins.trim();
    if origins == "*" {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn body_limit_layer() -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(MAX_BODY_BYTES)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
