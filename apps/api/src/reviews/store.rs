use sqlx::PgPool;
use uuid::Uuid;

use crate::models::month::Month;
use crate::models::review::PerformanceReviewRow;
use crate::reviews::validation::ReviewInput;

pub async fn get_review(
    pool: &PgPool,
    student_id: Uuid,
    month: Month,
) -> Result<Option<PerformanceReviewRow>, sqlx::Error> {
    sqlx::query_as::<_, PerformanceReviewRow>(
        "SELECT * FROM performance_reviews WHERE student_id = $1 AND month = $2",
    )
    .bind(student_id)
    .bind(month.first_day())
    .fetch_optional(pool)
    .await
}

pub async fn list_reviews(
    pool: &PgPool,
    student_id: Uuid,
) -> Result<Vec<PerformanceReviewRow>, sqlx::Error> {
    sqlx::query_as::<_, PerformanceReviewRow>(
        "SELECT * FROM performance_reviews WHERE student_id = $1 ORDER BY month DESC",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await
}

/// One review per student per month: a second save for the same month
/// replaces the first.
pub async fn upsert_review(
    pool: &PgPool,
    student_id: Uuid,
    month: Month,
    reviewer_id: Uuid,
    review: &ReviewInput,
) -> Result<PerformanceReviewRow, sqlx::Error> {
    sqlx::query_as::<_, PerformanceReviewRow>(
        r#"
        INSERT INTO performance_reviews
            (student_id, month, resume_quality, application_effectiveness,
             behavioral_performance, networking_capability, technical_proficiency,
             energy_level, attention_level, performance_rating, notes, reviewer_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT (student_id, month) DO UPDATE SET
            resume_quality = EXCLUDED.resume_quality,
            application_effectiveness = EXCLUDED.application_effectiveness,
            behavioral_performance = EXCLUDED.behavioral_performance,
            networking_capability = EXCLUDED.networking_capability,
            technical_proficiency = EXCLUDED.technical_proficiency,
            energy_level = EXCLUDED.energy_level,
            attention_level = EXCLUDED.attention_level,
            performance_rating = EXCLUDED.performance_rating,
            notes = EXCLUDED.notes,
            reviewer_id = EXCLUDED.reviewer_id,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(student_id)
    .bind(month.first_day())
    .bind(review.resume_quality)
    .bind(review.application_effectiveness)
    .bind(review.behavioral_performance)
    .bind(review.networking_capability)
    .bind(review.technical_proficiency)
    .bind(review.energy_level)
    .bind(review.attention_level)
    .bind(review.performance_rating)
    .bind(&review.notes)
    .bind(reviewer_id)
    .fetch_one(pool)
    .await
}

/// Returns whether a row was deleted.
pub async fn delete_review(pool: &PgPool, student_id: Uuid, month: Month) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM performance_reviews WHERE student_id = $1 AND month = $2")
        .bind(student_id)
        .bind(month.first_day())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
