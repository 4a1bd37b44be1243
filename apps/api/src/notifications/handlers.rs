use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::ProfileRow;
use crate::models::reminder::ReminderRow;
use crate::notifications::smtp::{send_email, SendEmailRequest, SendEmailResponse};
use crate::notifications::store::{create_reminder, list_reminders};
use crate::notifications::{validate_reminder, ReminderInput};
use crate::state::AppState;
use crate::viewer::{Access, Viewer};

/// POST /api/v1/reminders
///
/// Staff only. Delivered by the background dispatcher once `due_at` passes.
pub async fn handle_create_reminder(
    State(state): State<AppState>,
    viewer: Viewer,
    Json(input): Json<ReminderInput>,
) -> Result<(StatusCode, Json<ReminderRow>), AppError> {
    viewer.require_staff()?;

    let fallback_email = match input.student_id {
        Some(student_id) => {
            let profile =
                sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
                    .bind(student_id)
                    .fetch_optional(&state.db)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Student {student_id} not found")))?;
            Some(profile.email)
        }
        None => None,
    };

    let reminder = validate_reminder(input, fallback_email)?;
    let row = create_reminder(&state.db, &reminder).await?;
    info!(
        "Scheduled reminder {} for {} at {}",
        row.id, row.recipient_email, row.due_at
    );
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/students/:student_id/reminders
pub async fn handle_list_reminders(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(student_id): Path<Uuid>,
) -> Result<Json<Vec<ReminderRow>>, AppError> {
    viewer.authorize(student_id, Access::Read)?;
    let reminders = list_reminders(&state.db, student_id).await?;
    Ok(Json(reminders))
}

/// POST /api/v1/notifications/email
///
/// Staff only. Sends one message through the SMTP server named in the request.
pub async fn handle_send_email(
    viewer: Viewer,
    Json(request): Json<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>, AppError> {
    viewer.require_staff()?;
    let response = send_email(&request).await?;
    info!(
        "Viewer {} sent email to {} recipient(s) via {}",
        viewer.id, response.recipients, request.smtp.host
    );
    Ok(Json(response))
}
