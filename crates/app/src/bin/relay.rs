// HuddleUp mail relay - standalone `POST /api/send-invite` server

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::{error, info};

use huddleup_app::{body_limit_layer, build_cors_layer, relay_app};
use huddleup_common::config::parse_port;
use huddleup_email::{EmailConfig, EmailServiceFactory};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .pretty()
        .init();

    let email_config = EmailConfig::from_env().map_err(|e| {
        error!("Failed to load email configuration: {}", e);
        e
    })?;
    let email = EmailServiceFactory::create(email_config)?;

    let cors_origins = std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string());
    let port = parse_port("API_PORT", 3001);

    // Applied innermost-first: trace is outermost, body limit innermost.
    let app = relay_app(Arc::from(email))
        .layer(body_limit_layer())
        .layer(build_cors_layer(&cors_origins))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Mail relay listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
