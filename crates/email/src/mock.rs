//! Mock Email Service Implementation
//!
//! In-memory email capture for tests and local development. Can also be
//! told to fail like a provider would, so error paths are testable.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{EmailError, EmailMessage, EmailReceipt, EmailService};

/// Email captured by the mock service
#[derive(Debug, Clone)]
pub struct CapturedEmail {
    pub message: EmailMessage,
    pub receipt: EmailReceipt,
    pub captured_at: DateTime<Utc>,
}

impl CapturedEmail {
    /// Extract the team code an invite carries
    pub fn extract_team_code(&self) -> Option<String> {
        if let Some(code) = self.message.metadata.get("team_code") {
            return Some(code.clone());
        }

        let text = format!(
            "{} {}",
            self.message.body_text.as_deref().unwrap_or(""),
            self.message.body_html.as_deref().unwrap_or("")
        );

        let patterns = [
            r#"[Uu]se code "([A-Z0-9]{6})""#,
            r"<code>([A-Z0-9]{6})</code>",
        ];

        for pattern in &patterns {
            if let Ok(re) = regex::Regex::new(pattern) {
                if let Some(captures) = re.captures(&text) {
                    if let Some(code) = captures.get(1) {
                        return Some(code.as_str().to_string());
                    }
                }
            }
        }

        None
    }
}

/// Mock email service for testing
#[derive(Debug, Clone)]
pub struct MockEmailService {
    emails: Arc<Mutex<Vec<CapturedEmail>>>,
    email_by_recipient: Arc<Mutex<HashMap<String, Vec<CapturedEmail>>>>,
    sender_email: String,
    sender_name: String,
    enabled: bool,
    failure: Option<(u16, String)>,
}

impl MockEmailService {
    /// Create a new mock email service
    pub fn new() -> Self {
        Self::with_sender("no-reply@huddleup.app", "HuddleUp")
    }

    /// Mock service that reports the given sender identity
    pub fn with_sender(sender_email: &str, sender_name: &str) -> Self {
        Self {
            emails: Arc::new(Mutex::new(Vec::new())),
            email_by_recipient: Arc::new(Mutex::new(HashMap::new())),
            sender_email: sender_email.to_string(),
            sender_name: sender_name.to_string(),
            enabled: true,
            failure: None,
        }
    }

    /// Create a disabled mock email service (accepts and drops everything)
    pub fn new_disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Every send fails as a provider error with this status
    pub fn failing_with(status: u16, message: &str) -> Self {
        Self {
            failure: Some((status, message.to_string())),
            ..Self::new()
        }
    }

    /// Get all captured emails
    pub fn get_all_emails(&self) -> Vec<CapturedEmail> {
        self.emails.lock().unwrap().clone()
    }

    /// Get emails sent to a specific recipient
    pub fn get_emails_for_recipient(&self, email: &str) -> Vec<CapturedEmail> {
        self.email_by_recipient
            .lock()
            .unwrap()
            .get(email)
            .cloned()
            .unwrap_or_default()
    }

    /// Get the most recent team invite sent to a recipient
    pub fn get_latest_invite(&self, email: &str) -> Option<CapturedEmail> {
        self.get_emails_for_recipient(email)
            .into_iter()
            .filter(|e| {
                e.message
                    .metadata
                    .get("email_type")
                    .map(|t| t == "team_invite")
                    .unwrap_or(false)
                    || e.message.subject.to_lowercase().contains("invite")
            })
            .max_by_key(|e| e.captured_at)
    }

    /// Check if a team invite was sent to a specific email address
    pub fn was_invite_sent_to(&self, email: &str) -> bool {
        self.get_latest_invite(email).is_some()
    }

    /// Get count of emails sent
    pub fn email_count(&self) -> usize {
        self.emails.lock().unwrap().len()
    }

    /// Clear all captured emails
    pub fn clear(&self) {
        self.emails.lock().unwrap().clear();
        self.email_by_recipient.lock().unwrap().clear();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        message.validate()?;

        if let Some((status, reason)) = &self.failure {
            tracing::warn!(status = *status, to = %message.to, "Mock email service failing send");
            return Err(EmailError::Provider {
                status: *status,
                message: reason.clone(),
            });
        }

        if !self.enabled {
            tracing::warn!("Mock email service disabled, skipping send");
            return Ok(EmailReceipt {
                message_id: format!("disabled-{}", Uuid::new_v4()),
                sent_at: Utc::now(),
                provider: "mock-disabled".to_string(),
                metadata: message.metadata.clone(),
            });
        }

        tracing::info!(to = %message.to, "Mock email service capturing email");

        let receipt = EmailReceipt {
            message_id: format!("mock-{}", Uuid::new_v4()),
            sent_at: Utc::now(),
            provider: "mock".to_string(),
            metadata: message.metadata.clone(),
        };

        let captured = CapturedEmail {
            message: message.clone(),
            receipt: receipt.clone(),
            captured_at: Utc::now(),
        };

        self.emails.lock().unwrap().push(captured.clone());
        self.email_by_recipient
            .lock()
            .unwrap()
            .entry(message.to)
            .or_default()
            .push(captured);

        Ok(receipt)
    }

    fn default_from(&self) -> String {
        self.sender_email.clone()
    }

    fn sender_name(&self) -> String {
        self.sender_name.clone()
    }
}
