use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::resume::{ResumeStatus, ResumeVersionRow};

pub struct NewResumeVersion<'a> {
    pub student_id: Uuid,
    pub version: i32,
    pub s3_key: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub size_bytes: i64,
}

pub async fn get_version(pool: &PgPool, id: Uuid) -> Result<Option<ResumeVersionRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeVersionRow>(
        "SELECT * FROM resume_versions WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_versions(pool: &PgPool, student_id: Uuid) -> Result<Vec<ResumeVersionRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeVersionRow>(
        "SELECT * FROM resume_versions WHERE student_id = $1 AND deleted_at IS NULL ORDER BY version DESC",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await
}

/// Serializes version assignment for one student until the transaction ends
/// by locking the student's profile row. The row exists even before the
/// first upload, so the very first version is covered too.
pub async fn lock_student_versions(
    tx: &mut Transaction<'_, Postgres>,
    student_id: Uuid,
) -> Result<(), sqlx::Error> {
    let locked: Option<Uuid> = sqlx::query_scalar(LOCK_STUDENT_SQL)
        .bind(student_id)
        .fetch_optional(&mut **tx)
        .await?;
    locked.map(|_| ()).ok_or(sqlx::Error::RowNotFound)
}

pub(crate) const LOCK_STUDENT_SQL: &str = "SELECT id FROM profiles WHERE id = $1 FOR UPDATE";

/// Highest version ever issued, including deleted ones.
pub async fn highest_version(
    tx: &mut Transaction<'_, Postgres>,
    student_id: Uuid,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar("SELECT MAX(version) FROM resume_versions WHERE student_id = $1")
        .bind(student_id)
        .fetch_one(&mut **tx)
        .await
}

pub async fn insert_version(
    tx: &mut Transaction<'_, Postgres>,
    new: NewResumeVersion<'_>,
) -> Result<ResumeVersionRow, sqlx::Error> {
    sqlx::query_as::<_, ResumeVersionRow>(
        r#"
        INSERT INTO resume_versions
            (student_id, version, s3_key, file_name, content_type, size_bytes, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(new.student_id)
    .bind(new.version)
    .bind(new.s3_key)
    .bind(new.file_name)
    .bind(new.content_type)
    .bind(new.size_bytes)
    .bind(ResumeStatus::Pending)
    .fetch_one(&mut **tx)
    .await
}

pub async fn record_decision(
    pool: &PgPool,
    id: Uuid,
    status: ResumeStatus,
    feedback: Option<&str>,
    reviewer_id: Uuid,
) -> Result<ResumeVersionRow, sqlx::Error> {
    sqlx::query_as::<_, ResumeVersionRow>(
        r#"
        UPDATE resume_versions
        SET status = $2, feedback = $3, reviewed_by = $4, reviewed_at = now()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(feedback)
    .bind(reviewer_id)
    .fetch_one(pool)
    .await
}

pub async fn mark_deleted(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE resume_versions SET deleted_at = now() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_lock_is_a_row_lock_on_the_student() {
        assert!(LOCK_STUDENT_SQL.contains("FROM profiles"));
        assert!(LOCK_STUDENT_SQL.ends_with("FOR UPDATE"));
    }
}
