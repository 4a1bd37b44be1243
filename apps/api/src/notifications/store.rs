use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::reminder::ReminderRow;
use crate::notifications::ValidReminder;

pub async fn create_reminder(pool: &PgPool, input: &ValidReminder) -> Result<ReminderRow, sqlx::Error> {
    sqlx::query_as::<_, ReminderRow>(
        r#"
        INSERT INTO reminders (student_id, recipient_email, subject, body, due_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(input.student_id)
    .bind(&input.recipient_email)
    .bind(&input.subject)
    .bind(&input.body)
    .bind(input.due_at)
    .fetch_one(pool)
    .await
}

pub async fn list_reminders(pool: &PgPool, student_id: Uuid) -> Result<Vec<ReminderRow>, sqlx::Error> {
    sqlx::query_as::<_, ReminderRow>(
        "SELECT * FROM reminders WHERE student_id = $1 ORDER BY due_at DESC",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await
}

/// Claims up to `limit` due pending reminders by moving them to `sending`.
/// Rows locked by another claimer are skipped.
pub async fn claim_due(
    pool: &PgPool,
    now: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<ReminderRow>, sqlx::Error> {
    sqlx::query_as::<_, ReminderRow>(
        r#"
        UPDATE reminders
        SET status = 'sending', claimed_at = now()
        WHERE id IN (
            SELECT id FROM reminders
            WHERE status = 'pending' AND due_at <= $1
            ORDER BY due_at
            LIMIT $2
            FOR UPDATE SKIP LOCKED
        )
        RETURNING *
        "#,
    )
    .bind(now)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn mark_sent(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE reminders
        SET status = 'sent', sent_at = now(), last_error = NULL
        WHERE id = $1 AND status = 'sending'
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn mark_failed(pool: &PgPool, id: Uuid, error: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE reminders SET status = 'failed', last_error = $2 WHERE id = $1 AND status = 'sending'",
    )
    .bind(id)
    .bind(error)
    .execute(pool)
    .await?;
    Ok(())
}

/// Claims older than `cutoff` whose outcome was never recorded. They may or
/// may not have gone out, so they are failed rather than sent again.
pub async fn fail_stale_claims(pool: &PgPool, cutoff: DateTime<Utc>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE reminders
        SET status = 'failed', last_error = 'delivery outcome was not recorded'
        WHERE status = 'sending' AND claimed_at < $1
        "#,
    )
    .bind(cutoff)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
