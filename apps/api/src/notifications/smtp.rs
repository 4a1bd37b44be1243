//! One-off email over SMTP with credentials supplied per call.
//!
//! Nothing is stored: the request carries the server, login and message, and
//! the response reports whether the relay accepted it.

use std::time::Duration;

use lettre::message::{header::ContentType, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RECIPIENTS: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("Invalid email request: {0}")]
    Invalid(String),
}

impl From<EmailError> for AppError {
    fn from(e: EmailError) -> Self {
        match e {
            EmailError::Transport(e) => AppError::Email(e.to_string()),
            other => AppError::Validation(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SmtpTls {
    /// Plain connection upgraded with STARTTLS.
    #[default]
    Starttls,
    /// Implicit TLS from the first byte.
    Tls,
    None,
}

impl SmtpTls {
    pub fn default_port(self) -> u16 {
        match self {
            SmtpTls::Starttls => 587,
            SmtpTls::Tls => 465,
            SmtpTls::None => 25,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub tls: SmtpTls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendEmailRequest {
    pub smtp: SmtpSettings,
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub accepted: bool,
    pub recipients: usize,
    pub smtp_response: String,
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, EmailError> {
    Ok(raw.trim().parse::<Mailbox>()?)
}

/// Checks the request and builds the message without touching the network.
pub fn build_message(req: &SendEmailRequest) -> Result<Message, EmailError> {
    if req.smtp.host.trim().is_empty() {
        return Err(EmailError::Invalid("SMTP host is required".into()));
    }
    if req.smtp.username.is_some() != req.smtp.password.is_some() {
        return Err(EmailError::Invalid(
            "SMTP username and password must be given together".into(),
        ));
    }
    if req.to.is_empty() {
        return Err(EmailError::Invalid("At least one recipient is required".into()));
    }
    if req.to.len() > MAX_RECIPIENTS {
        return Err(EmailError::Invalid(format!(
            "At most {MAX_RECIPIENTS} recipients are allowed"
        )));
    }
    if req.subject.trim().is_empty() {
        return Err(EmailError::Invalid("Subject is required".into()));
    }

    let text = req.text.as_deref().filter(|t| !t.trim().is_empty());
    let html = req.html.as_deref().filter(|h| !h.trim().is_empty());

    let mut builder = Message::builder()
        .from(parse_mailbox(&req.from)?)
        .subject(req.subject.trim());
    for to in &req.to {
        builder = builder.to(parse_mailbox(to)?);
    }

    let message = match (text, html) {
        (Some(text), Some(html)) => builder.multipart(MultiPart::alternative_plain_html(
            text.to_string(),
            html.to_string(),
        ))?,
        (None, Some(html)) => builder
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())?,
        (Some(text), None) => builder
            .header(ContentType::TEXT_PLAIN)
            .body(text.to_string())?,
        (None, None) => {
            return Err(EmailError::Invalid("A text or html body is required".into()));
        }
    };
    Ok(message)
}

fn transport(settings: &SmtpSettings) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
    let host = settings.host.trim();
    let mut builder = match settings.tls {
        SmtpTls::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?,
        SmtpTls::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)?,
        SmtpTls::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
    }
    .port(settings.port.unwrap_or(settings.tls.default_port()))
    .timeout(Some(SMTP_TIMEOUT));

    if let (Some(user), Some(pass)) = (&settings.username, &settings.password) {
        builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
    }
    Ok(builder.build())
}

pub async fn send_email(req: &SendEmailRequest) -> Result<SendEmailResponse, EmailError> {
    let message = build_message(req)?;
    let mailer = transport(&req.smtp)?;
    let response = mailer.send(message).await?;

    tracing::info!(
        host = %req.smtp.host,
        recipients = req.to.len(),
        "Email sent over SMTP"
    );

    Ok(SendEmailResponse {
        accepted: response.is_positive(),
        recipients: req.to.len(),
        smtp_response: response.message().collect::<Vec<_>>().join(" "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SendEmailRequest {
        SendEmailRequest {
            smtp: SmtpSettings {
                host: "smtp.example.com".to_string(),
                port: None,
                username: Some("coach".to_string()),
                password: Some("secret".to_string()),
                tls: SmtpTls::Starttls,
            },
            from: "Coach <coach@example.com>".to_string(),
            to: vec!["sam@example.com".to_string()],
            subject: "Mock interview follow-up".to_string(),
            text: Some("See notes attached.".to_string()),
            html: None,
        }
    }

    #[test]
    fn test_builds_plain_message() {
        let message = build_message(&request()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Mock interview follow-up"));
        assert!(raw.contains("To: sam@example.com"));
    }

    #[test]
    fn test_builds_alternative_when_both_bodies() {
        let req = SendEmailRequest {
            html: Some("<p>See notes attached.</p>".to_string()),
            ..request()
        };
        let raw = String::from_utf8(build_message(&req).unwrap().formatted()).unwrap();
        assert!(raw.contains("multipart/alternative"));
    }

    #[test]
    fn test_requires_a_body() {
        let req = SendEmailRequest {
            text: Some("   ".to_string()),
            ..request()
        };
        assert!(matches!(build_message(&req), Err(EmailError::Invalid(_))));
    }

    #[test]
    fn test_requires_recipients() {
        let req = SendEmailRequest {
            to: vec![],
            ..request()
        };
        assert!(matches!(build_message(&req), Err(EmailError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_recipient() {
        let req = SendEmailRequest {
            to: vec!["not-an-email".to_string()],
            ..request()
        };
        assert!(matches!(build_message(&req), Err(EmailError::Address(_))));
    }

    #[test]
    fn test_credentials_come_in_pairs() {
        let mut req = request();
        req.smtp.password = None;
        assert!(matches!(build_message(&req), Err(EmailError::Invalid(_))));
    }

    #[test]
    fn test_default_ports() {
        assert_eq!(SmtpTls::Starttls.default_port(), 587);
        assert_eq!(SmtpTls::Tls.default_port(), 465);
        assert_eq!(SmtpTls::None.default_port(), 25);
    }

    #[test]
    fn test_invalid_maps_to_validation() {
        let err: AppError = EmailError::Invalid("x".into()).into();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
