use sqlx::PgPool;
use uuid::Uuid;

use crate::activity::{JobApplicationInput, NetworkingInput};
use crate::models::activity::{JobApplicationRow, NetworkingInteractionRow};
use crate::models::month::Month;

fn to_count(n: i64) -> u32 {
    u32::try_from(n.max(0)).unwrap_or(u32::MAX)
}

pub async fn count_applications_in_month(
    pool: &PgPool,
    student_id: Uuid,
    month: Month,
) -> Result<u32, sqlx::Error> {
    let (start, end) = month.bounds();
    let n: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM job_applications WHERE student_id = $1 AND applied_on >= $2 AND applied_on < $3",
    )
    .bind(student_id)
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;
    Ok(to_count(n))
}

pub async fn count_networking_in_month(
    pool: &PgPool,
    student_id: Uuid,
    month: Month,
) -> Result<u32, sqlx::Error> {
    let (start, end) = month.bounds();
    let n: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM networking_interactions WHERE student_id = $1 AND occurred_on >= $2 AND occurred_on < $3",
    )
    .bind(student_id)
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;
    Ok(to_count(n))
}

pub async fn get_application(pool: &PgPool, id: Uuid) -> Result<Option<JobApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, JobApplicationRow>("SELECT * FROM job_applications WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_applications(
    pool: &PgPool,
    student_id: Uuid,
    month: Option<Month>,
) -> Result<Vec<JobApplicationRow>, sqlx::Error> {
    match month {
        Some(month) => {
            let (start, end) = month.bounds();
            sqlx::query_as::<_, JobApplicationRow>(
                r#"
                SELECT * FROM job_applications
                WHERE student_id = $1 AND applied_on >= $2 AND applied_on < $3
                ORDER BY applied_on DESC, created_at DESC
                "#,
            )
            .bind(student_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, JobApplicationRow>(
                "SELECT * FROM job_applications WHERE student_id = $1 ORDER BY applied_on DESC, created_at DESC",
            )
            .bind(student_id)
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn create_application(
    pool: &PgPool,
    student_id: Uuid,
    input: &JobApplicationInput,
) -> Result<JobApplicationRow, sqlx::Error> {
    sqlx::query_as::<_, JobApplicationRow>(
        r#"
        INSERT INTO job_applications
            (student_id, company, role_title, status, applied_on, job_url, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(student_id)
    .bind(&input.company)
    .bind(&input.role_title)
    .bind(input.status)
    .bind(input.applied_on)
    .bind(&input.job_url)
    .bind(&input.notes)
    .fetch_one(pool)
    .await
}

pub async fn update_application(
    pool: &PgPool,
    id: Uuid,
    input: &JobApplicationInput,
) -> Result<JobApplicationRow, sqlx::Error> {
    sqlx::query_as::<_, JobApplicationRow>(
        r#"
        UPDATE job_applications SET
            company = $2, role_title = $3, status = $4, applied_on = $5,
            job_url = $6, notes = $7, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.company)
    .bind(&input.role_title)
    .bind(input.status)
    .bind(input.applied_on)
    .bind(&input.job_url)
    .bind(&input.notes)
    .fetch_one(pool)
    .await
}

pub async fn delete_application(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM job_applications WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn get_interaction(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<NetworkingInteractionRow>, sqlx::Error> {
    sqlx::query_as::<_, NetworkingInteractionRow>(
        "SELECT * FROM networking_interactions WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_interactions(
    pool: &PgPool,
    student_id: Uuid,
    month: Option<Month>,
) -> Result<Vec<NetworkingInteractionRow>, sqlx::Error> {
    match month {
        Some(month) => {
            let (start, end) = month.bounds();
            sqlx::query_as::<_, NetworkingInteractionRow>(
                r#"
                SELECT * FROM networking_interactions
                WHERE student_id = $1 AND occurred_on >= $2 AND occurred_on < $3
                ORDER BY occurred_on DESC, created_at DESC
                "#,
            )
            .bind(student_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, NetworkingInteractionRow>(
                "SELECT * FROM networking_interactions WHERE student_id = $1 ORDER BY occurred_on DESC, created_at DESC",
            )
            .bind(student_id)
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn create_interaction(
    pool: &PgPool,
    student_id: Uuid,
    input: &NetworkingInput,
) -> Result<NetworkingInteractionRow, sqlx::Error> {
    sqlx::query_as::<_, NetworkingInteractionRow>(
        r#"
        INSERT INTO networking_interactions
            (student_id, contact_name, company, interaction_type, occurred_on, follow_up_on, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(student_id)
    .bind(&input.contact_name)
    .bind(&input.company)
    .bind(&input.interaction_type)
    .bind(input.occurred_on)
    .bind(input.follow_up_on)
    .bind(&input.notes)
    .fetch_one(pool)
    .await
}

pub async fn update_interaction(
    pool: &PgPool,
    id: Uuid,
    input: &NetworkingInput,
) -> Result<NetworkingInteractionRow, sqlx::Error> {
    sqlx::query_as::<_, NetworkingInteractionRow>(
        r#"
        UPDATE networking_interactions SET
            contact_name = $2, company = $3, interaction_type = $4,
            occurred_on = $5, follow_up_on = $6, notes = $7
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.contact_name)
    .bind(&input.company)
    .bind(&input.interaction_type)
    .bind(input.occurred_on)
    .bind(input.follow_up_on)
    .bind(&input.notes)
    .fetch_one(pool)
    .await
}

pub async fn delete_interaction(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM networking_interactions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
