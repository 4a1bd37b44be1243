use sqlx::PgPool;
use uuid::Uuid;

use crate::models::month::Month;
use crate::models::office_hours::OfficeHoursRow;
use crate::office_hours::OfficeHoursInput;

pub async fn get_record(pool: &PgPool, id: Uuid) -> Result<Option<OfficeHoursRow>, sqlx::Error> {
    sqlx::query_as::<_, OfficeHoursRow>("SELECT * FROM office_hours_records WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_records(
    pool: &PgPool,
    student_id: Uuid,
    month: Option<Month>,
) -> Result<Vec<OfficeHoursRow>, sqlx::Error> {
    match month {
        Some(month) => {
            let (start, end) = month.bounds();
            sqlx::query_as::<_, OfficeHoursRow>(
                r#"
                SELECT * FROM office_hours_records
                WHERE student_id = $1 AND session_date >= $2 AND session_date < $3
                ORDER BY session_date DESC, created_at DESC
                "#,
            )
            .bind(student_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, OfficeHoursRow>(
                "SELECT * FROM office_hours_records WHERE student_id = $1 ORDER BY session_date DESC, created_at DESC",
            )
            .bind(student_id)
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn create_record(
    pool: &PgPool,
    student_id: Uuid,
    created_by: Uuid,
    input: &OfficeHoursInput,
) -> Result<OfficeHoursRow, sqlx::Error> {
    sqlx::query_as::<_, OfficeHoursRow>(
        r#"
        INSERT INTO office_hours_records
            (student_id, session_date, duration_minutes, topics, action_items, notes, created_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(student_id)
    .bind(input.session_date)
    .bind(input.duration_minutes)
    .bind(&input.topics)
    .bind(&input.action_items)
    .bind(&input.notes)
    .bind(created_by)
    .fetch_one(pool)
    .await
}

pub async fn update_record(
    pool: &PgPool,
    id: Uuid,
    input: &OfficeHoursInput,
) -> Result<OfficeHoursRow, sqlx::Error> {
    sqlx::query_as::<_, OfficeHoursRow>(
        r#"
        UPDATE office_hours_records SET
            session_date = $2, duration_minutes = $3, topics = $4,
            action_items = $5, notes = $6
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.session_date)
    .bind(input.duration_minutes)
    .bind(&input.topics)
    .bind(&input.action_items)
    .bind(&input.notes)
    .fetch_one(pool)
    .await
}

pub async fn delete_record(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM office_hours_records WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
