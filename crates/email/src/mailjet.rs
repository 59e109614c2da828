//! Mailjet email service implementation (v3.1 send API)

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::{EmailConfig, EmailError, EmailMessage, EmailReceipt, EmailService};

pub const DEFAULT_API_URL: &str = "https://api.mailjet.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Mailjet email service
pub struct MailjetEmailService {
    client: reqwest::Client,
    api_url: String,
    api_key_public: String,
    api_key_private: String,
    config: EmailConfig,
}

impl MailjetEmailService {
    /// Create a new Mailjet email service; both API keys are required
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let (api_key_public, api_key_private) = match (
            config.mailjet_api_key_public.as_deref(),
            config.mailjet_api_key_private.as_deref(),
        ) {
            (Some(public), Some(private)) if !public.is_empty() && !private.is_empty() => {
                (public.to_string(), private.to_string())
            }
            _ => {
                return Err(EmailError::Configuration(
                    "MJ_APIKEY_PUBLIC and MJ_APIKEY_PRIVATE must both be set".to_string(),
                ))
            }
        };

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EmailError::Configuration(format!("HTTP client: {}", e)))?;

        info!(api_url = %config.mailjet_api_url, "Mailjet email service initialized");

        Ok(Self {
            client,
            api_url: config.mailjet_api_url.trim_end_matches('/').to_string(),
            api_key_public,
            api_key_private,
            config,
        })
    }

    fn send_body(message: &EmailMessage) -> Value {
        let mut entry = json!({
            "From": {
                "Email": message.from,
                "Name": message.from_name.clone().unwrap_or_default(),
            },
            "To": [{ "Email": message.to }],
            "Subject": message.subject,
        });

        if let Some(text) = &message.body_text {
            entry["TextPart"] = json!(text);
        }
        if let Some(html) = &message.body_html {
            entry["HTMLPart"] = json!(html);
        }
        if let Some(reply_to) = &message.reply_to {
            entry["ReplyTo"] = json!({ "Email": reply_to });
        }

        json!({ "Messages": [entry] })
    }

    /// Pull the best human-readable reason out of a Mailjet error payload
    fn provider_message(status: u16, raw: &str) -> String {
        let parsed: Option<Value> = serde_json::from_str(raw).ok();
        let from_json = parsed.as_ref().and_then(|v| {
            v.get("ErrorMessage")
                .or_else(|| v.pointer("/Messages/0/Errors/0/ErrorMessage"))
                .and_then(Value::as_str)
                .map(str::to_string)
        });

        from_json
            .or_else(|| Some(raw.trim().to_string()).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| format!("Mailjet request failed with status {}", status))
    }
}

#[async_trait::async_trait]
impl EmailService for MailjetEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        message.validate()?;

        debug!(
            to = %message.to,
            subject = %message.subject,
            "Sending email via Mailjet"
        );

        let response = self
            .client
            .post(format!("{}/v3.1/send", self.api_url))
            .basic_auth(&self.api_key_public, Some(&self.api_key_private))
            .json(&Self::send_body(&message))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, to = %message.to, "Mailjet request failed");
                EmailError::Transport(e.to_string())
            })?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message_text = Self::provider_message(status.as_u16(), &raw);
            error!(
                status = status.as_u16(),
                error = %message_text,
                to = %message.to,
                "Mailjet rejected email"
            );
            return Err(EmailError::Provider {
                status: status.as_u16(),
                message: message_text,
            });
        }

        let message_id = serde_json::from_str::<Value>(&raw)
            .ok()
            .and_then(|v| {
                v.pointer("/Messages/0/To/0/MessageUUID")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        info!(message_id = %message_id, to = %message.to, "Email sent via Mailjet");

        Ok(EmailReceipt {
            message_id,
            sent_at: Utc::now(),
            provider: "mailjet".to_string(),
            metadata: HashMap::new(),
        })
    }

    fn default_from(&self) -> String {
        self.config.sender_email.clone()
    }

    fn sender_name(&self) -> String {
        self.config.sender_name.clone()
    }
}
