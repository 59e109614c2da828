//! HuddleUp Email Service
//!
//! Provides email functionality for team invites with support for:
//! - Mailjet (v3.1 send API) for production delivery
//! - Mock email service for testing and development
//! - The `/api/send-invite` relay endpoint

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod content;
pub mod mailjet;
pub mod mock;
pub mod relay;

pub use relay::RelayState;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Email configuration error: {0}")]
    Configuration(String),

    #[error("Email validation error: {0}")]
    Validation(String),

    /// The provider answered with a non-success HTTP status
    #[error("{message}")]
    Provider { status: u16, message: String },

    /// The provider could not be reached or answered garbage
    #[error("Email transport error: {0}")]
    Transport(String),
}

/// Email message to be sent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub from_name: Option<String>,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl EmailMessage {
    /// Create a new email message with no body yet
    pub fn new(to: String, from: String, subject: String) -> Self {
        Self {
            to,
            from,
            from_name: None,
            reply_to: None,
            subject,
            body_text: None,
            body_html: None,
            metadata: HashMap::new(),
        }
    }

    /// Add plain-text body content
    pub fn with_text(mut self, body_text: String) -> Self {
        self.body_text = Some(body_text);
        self
    }

    /// Add HTML body content
    pub fn with_html(mut self, body_html: String) -> Self {
        self.body_html = Some(body_html);
        self
    }

    /// Display name for the sender
    pub fn with_from_name(mut self, from_name: String) -> Self {
        self.from_name = Some(from_name);
        self
    }

    /// Add reply-to address
    pub fn with_reply_to(mut self, reply_to: String) -> Self {
        self.reply_to = Some(reply_to);
        self
    }

    /// Add metadata for tracking
    pub fn with_metadata(mut self, key: String, value: String) -> Self {
        self.metadata.insert(key, value);
        self
    }

    /// True when at least one non-blank body part is present
    pub fn has_body(&self) -> bool {
        let present = |part: &Option<String>| part.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.body_text) || present(&self.body_html)
    }

    /// Reject messages no provider would accept
    pub fn validate(&self) -> Result<(), EmailError> {
        if !self.to.contains('@') || !self.from.contains('@') {
            return Err(EmailError::Validation(
                "Invalid email address format".to_string(),
            ));
        }
        if self.subject.trim().is_empty() {
            return Err(EmailError::Validation("Subject is required".to_string()));
        }
        if !self.has_body() {
            return Err(EmailError::Validation(
                "Either a text or an HTML body is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Email delivery receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub message_id: String,
    pub sent_at: DateTime<Utc>,
    pub provider: String,
    pub metadata: HashMap<String, String>,
}

/// Everything needed to render a team invite email
#[derive(Debug, Clone)]
pub struct TeamInvite {
    pub player_name: String,
    pub player_email: String,
    pub coach_name: String,
    pub team_name: String,
    pub team_code: String,
}

/// Email service configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Email service provider (mailjet, mock)
    pub provider: String,
    /// Mailjet API key pair
    pub mailjet_api_key_public: Option<String>,
    pub mailjet_api_key_private: Option<String>,
    /// Mailjet API base URL (overridable for tests)
    pub mailjet_api_url: String,
    /// Sender address and display name
    pub sender_email: String,
    pub sender_name: String,
    /// Enable email sending (can disable for testing)
    pub enabled: bool,
}

impl EmailConfig {
    /// Create email config from environment variables
    pub fn from_env() -> Result<Self, EmailError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("EMAIL_PROVIDER").unwrap_or_else(|_| "mock".to_string());

        let mailjet_api_key_public = std::env::var("MJ_APIKEY_PUBLIC").ok();
        let mailjet_api_key_private = std::env::var("MJ_APIKEY_PRIVATE").ok();
        let mailjet_api_url = std::env::var("MAILJET_API_URL")
            .unwrap_or_else(|_| mailjet::DEFAULT_API_URL.to_string());

        let sender_email = std::env::var("MJ_SENDER_EMAIL")
            .unwrap_or_else(|_| "no-reply@huddleup.app".to_string());
        let sender_name = std::env::var("MJ_SENDER_NAME").unwrap_or_else(|_| "HuddleUp".to_string());

        let enabled = std::env::var("EMAIL_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        Ok(Self {
            provider,
            mailjet_api_key_public,
            mailjet_api_key_private,
            mailjet_api_url,
            sender_email,
            sender_name,
            enabled,
        })
    }
}

/// Email service trait for different implementations
#[async_trait::async_trait]
pub trait EmailService: Send + Sync {
    /// Send an email message
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError>;

    /// Return the default "from" address for outgoing emails
    fn default_from(&self) -> String;

    /// Return the sender display name
    fn sender_name(&self) -> String;

    /// Address a message from the configured sender
    fn compose(&self, to: &str, subject: &str) -> EmailMessage {
        EmailMessage::new(to.to_string(), self.default_from(), subject.to_string())
            .with_from_name(self.sender_name())
    }

    /// Send a "join my team" email carrying the team code
    async fn send_team_invite(&self, invite: &TeamInvite) -> Result<EmailReceipt, EmailError> {
        let subject = content::team_invite_subject(&invite.team_name);

        let message = self
            .compose(&invite.player_email, &subject)
            .with_text(content::team_invite_text(invite))
            .with_html(content::team_invite_html(invite))
            .with_metadata("email_type".to_string(), "team_invite".to_string())
            .with_metadata("team_code".to_string(), invite.team_code.clone());

        self.send_email(message).await
    }
}

/// Email service factory
pub struct EmailServiceFactory;

impl EmailServiceFactory {
    /// Create email service based on configuration
    pub fn create(config: EmailConfig) -> Result<Box<dyn EmailService>, EmailError> {
        if !config.enabled {
            tracing::info!("Email service disabled, using mock implementation");
            return Ok(Box::new(mock::MockEmailService::with_sender(
                &config.sender_email,
                &config.sender_name,
            )));
        }

        match config.provider.as_str() {
            "mailjet" => {
                tracing::info!("Creating Mailjet email service");
                let service = mailjet::MailjetEmailService::new(config)?;
                Ok(Box::new(service))
            }
            "mock" => {
                tracing::info!("Creating mock email service");
                Ok(Box::new(mock::MockEmailService::with_sender(
                    &config.sender_email,
                    &config.sender_name,
                )))
            }
            provider => Err(EmailError::Configuration(format!(
                "Unknown email provider: {}. Supported providers: mailjet, mock",
                provider
            ))),
        }
    }
}
