use sqlx::PgPool;
use uuid::Uuid;

use crate::interviews::validation::MockInterviewInput;
use crate::models::interview::{InterviewType, MockInterviewRow};
use crate::models::month::Month;

pub async fn get_interview(pool: &PgPool, id: Uuid) -> Result<Option<MockInterviewRow>, sqlx::Error> {
    sqlx::query_as::<_, MockInterviewRow>("SELECT * FROM mock_interviews WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// All interviews for a student, newest first; limited to `month` when given.
pub async fn list_interviews(
    pool: &PgPool,
    student_id: Uuid,
    month: Option<Month>,
) -> Result<Vec<MockInterviewRow>, sqlx::Error> {
    match month {
        Some(month) => {
            let (start, end) = month.bounds();
            sqlx::query_as::<_, MockInterviewRow>(
                r#"
                SELECT * FROM mock_interviews
                WHERE student_id = $1 AND interview_date >= $2 AND interview_date < $3
                ORDER BY interview_date DESC, created_at DESC
                "#,
            )
            .bind(student_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, MockInterviewRow>(
                "SELECT * FROM mock_interviews WHERE student_id = $1 ORDER BY interview_date DESC, created_at DESC",
            )
            .bind(student_id)
            .fetch_all(pool)
            .await
        }
    }
}

/// Overall rating of the most recent behavioral interview up to the end of `month`.
pub async fn latest_behavioral_rating(
    pool: &PgPool,
    student_id: Uuid,
    month: Month,
) -> Result<Option<f64>, sqlx::Error> {
    let (_, end) = month.bounds();
    sqlx::query_scalar(
        r#"
        SELECT overall_rating FROM mock_interviews
        WHERE student_id = $1 AND interview_type = $2 AND interview_date < $3
        ORDER BY interview_date DESC, created_at DESC
        LIMIT 1
        "#,
    )
    .bind(student_id)
    .bind(InterviewType::Behavioral)
    .bind(end)
    .fetch_optional(pool)
    .await
}

pub async fn create_interview(
    pool: &PgPool,
    student_id: Uuid,
    input: &MockInterviewInput,
) -> Result<MockInterviewRow, sqlx::Error> {
    sqlx::query_as::<_, MockInterviewRow>(
        r#"
        INSERT INTO mock_interviews
            (student_id, interview_date, interview_type, interviewer, overall_rating,
             strengths, improvements, recording_url, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(student_id)
    .bind(input.interview_date)
    .bind(input.interview_type)
    .bind(&input.interviewer)
    .bind(input.overall_rating)
    .bind(&input.strengths)
    .bind(&input.improvements)
    .bind(&input.recording_url)
    .bind(&input.notes)
    .fetch_one(pool)
    .await
}

pub async fn update_interview(
    pool: &PgPool,
    id: Uuid,
    input: &MockInterviewInput,
) -> Result<MockInterviewRow, sqlx::Error> {
    sqlx::query_as::<_, MockInterviewRow>(
        r#"
        UPDATE mock_interviews SET
            interview_date = $2, interview_type = $3, interviewer = $4,
            overall_rating = $5, strengths = $6, improvements = $7,
            recording_url = $8, notes = $9
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.interview_date)
    .bind(input.interview_type)
    .bind(&input.interviewer)
    .bind(input.overall_rating)
    .bind(&input.strengths)
    .bind(&input.improvements)
    .bind(&input.recording_url)
    .bind(&input.notes)
    .fetch_one(pool)
    .await
}

pub async fn delete_interview(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM mock_interviews WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
