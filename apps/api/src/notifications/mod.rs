//! Reminder delivery and ad-hoc email.
//!
//! Reminders are rows in `reminders`; the [`dispatcher::ReminderDispatcher`]
//! polls for due ones and sends them through the transactional email API.
//! `smtp` sends one-off messages over caller-supplied SMTP credentials.

pub mod dispatcher;
pub mod handlers;
pub mod smtp;
pub mod store;
pub mod transactional;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;

const MAX_SUBJECT_CHARS: usize = 200;

#[derive(Debug, Clone, Deserialize)]
pub struct ReminderInput {
    pub student_id: Option<Uuid>,
    /// Falls back to the student's profile email when omitted.
    pub recipient_email: Option<String>,
    pub subject: String,
    pub body: String,
    pub due_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidReminder {
    pub student_id: Option<Uuid>,
    pub recipient_email: String,
    pub subject: String,
    pub body: String,
    pub due_at: DateTime<Utc>,
}

/// `fallback_email` is the student's profile email, if a student was given.
pub fn validate_reminder(
    input: ReminderInput,
    fallback_email: Option<String>,
) -> Result<ValidReminder, AppError> {
    let subject = input.subject.trim().to_string();
    if subject.is_empty() {
        return Err(AppError::Validation("Reminder subject is required".into()));
    }
    if subject.chars().count() > MAX_SUBJECT_CHARS {
        return Err(AppError::Validation(format!(
            "Reminder subject must be at most {MAX_SUBJECT_CHARS} characters"
        )));
    }
    let body = input.body.trim().to_string();
    if body.is_empty() {
        return Err(AppError::Validation("Reminder body is required".into()));
    }

    let recipient = input
        .recipient_email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .or(fallback_email)
        .ok_or_else(|| {
            AppError::Validation("A recipient email or a student is required".into())
        })?;
    recipient
        .parse::<lettre::Address>()
        .map_err(|_| AppError::Validation(format!("Invalid recipient email '{recipient}'")))?;

    Ok(ValidReminder {
        student_id: input.student_id,
        recipient_email: recipient,
        subject,
        body,
        due_at: input.due_at,
    })
}
