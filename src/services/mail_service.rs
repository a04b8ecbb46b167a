use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::info;

use crate::config::MailSettings;
use crate::models::email_request::{display_value, EmailRequest};

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mail relay is not configured (SENDER, PASSWORD and RECIPENT are required)")]
    NotConfigured,

    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Delivers a plain-text message to the configured recipient.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailRelay: Send + Sync {
    fn recipient(&self) -> String;

    async fn send(&self, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Implicit-TLS SMTP relay authenticated as the sender account.
#[derive(Clone)]
pub struct SmtpMailRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipient: String,
}

impl SmtpMailRelay {
    pub fn new(settings: &MailSettings) -> Result<Self, MailError> {
        let sender: Mailbox = settings.sender.parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_host)?
            .credentials(Credentials::new(settings.sender.clone(), settings.password.clone()))
            .build();
        Ok(SmtpMailRelay { transport, sender, recipient: settings.recipient.clone() })
    }
}

#[async_trait]
impl MailRelay for SmtpMailRelay {
    fn recipient(&self) -> String {
        self.recipient.clone()
    }

    async fn send(&self, subject: &str, body: &str) -> Result<(), MailError> {
        let mut builder = Message::builder()
            .from(self.sender.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);
        for address in self.recipient.split(',').map(str::trim).filter(|a| !a.is_empty()) {
            builder = builder.to(address.parse()?);
        }
        let message = builder.body(body.to_string())?;
        self.transport.send(message).await?;
        info!("Message sent!");
        Ok(())
    }
}

/// Stand-in used when no mail credentials are configured.
pub struct DisabledMailRelay;

#[async_trait]
impl MailRelay for DisabledMailRelay {
    fn recipient(&self) -> String {
        String::new()
    }

    async fn send(&self, _subject: &str, _body: &str) -> Result<(), MailError> {
        Err(MailError::NotConfigured)
    }
}

/// Builds the transcript email body.
pub fn compose_body(request: &EmailRequest) -> String {
    let mut body = String::from("Chat History with User:\n\n");
    for (person, message) in &request.chat {
        let _ = writeln!(body, "{} - {}", person, display_value(message));
    }
    let _ = writeln!(body, "\nUser IP Address: {}", request.ip_address);
    body.push_str("\nUser IP Address Information:\n");
    for (key, value) in &request.user_info {
        let _ = writeln!(body, "{} - {}", key, display_value(value));
    }
    body
}

#[derive(Clone)]
pub struct MailService {
    relay: Arc<dyn MailRelay>,
}

impl MailService {
    pub fn new(relay: Arc<dyn MailRelay>) -> Self {
        MailService { relay }
    }

    /// Emails the transcript and returns the recipient it went to.
    pub async fn send_transcript(&self, request: &EmailRequest) -> Result<String, MailError> {
        let body = compose_body(request);
        info!("Sending transcript for session {}", request.session_id);
        self.relay.send(&request.subject, &body).await?;
        Ok(self.relay.recipient())
    }
}
