use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::goals::targets::ValidCareerGoal;
use crate::models::goal::CareerGoalRow;

pub async fn get_goal(pool: &PgPool, student_id: Uuid) -> Result<Option<CareerGoalRow>, sqlx::Error> {
    sqlx::query_as::<_, CareerGoalRow>("SELECT * FROM career_goals WHERE student_id = $1")
        .bind(student_id)
        .fetch_optional(pool)
        .await
}

/// Inserts or replaces the single career goal a student may have.
pub async fn upsert_goal(
    pool: &PgPool,
    student_id: Uuid,
    goal: ValidCareerGoal,
) -> Result<CareerGoalRow, sqlx::Error> {
    sqlx::query_as::<_, CareerGoalRow>(
        r#"
        INSERT INTO career_goals
            (student_id, target_roles, target_industries,
             weekly_application_goal, weekly_networking_goal,
             monthly_application_goal, monthly_networking_goal,
             campaign_start, campaign_end)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (student_id) DO UPDATE SET
            target_roles = EXCLUDED.target_roles,
            target_industries = EXCLUDED.target_industries,
            weekly_application_goal = EXCLUDED.weekly_application_goal,
            weekly_networking_goal = EXCLUDED.weekly_networking_goal,
            monthly_application_goal = EXCLUDED.monthly_application_goal,
            monthly_networking_goal = EXCLUDED.monthly_networking_goal,
            campaign_start = EXCLUDED.campaign_start,
            campaign_end = EXCLUDED.campaign_end,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(student_id)
    .bind(goal.target_roles.into_inner())
    .bind(goal.target_industries.into_inner())
    .bind(goal.weekly_application_goal)
    .bind(goal.weekly_networking_goal)
    .bind(goal.monthly_application_goal)
    .bind(goal.monthly_networking_goal)
    .bind(goal.campaign_start)
    .bind(goal.campaign_end)
    .fetch_one(pool)
    .await
}

pub(crate) const LOCK_GOAL_SQL: &str = "SELECT * FROM career_goals WHERE student_id = $1 FOR UPDATE";

/// Locks the student's goal row for the rest of the transaction, creating an
/// empty one first if none exists, so concurrent target edits serialize.
pub async fn lock_goal(
    tx: &mut Transaction<'_, Postgres>,
    student_id: Uuid,
) -> Result<CareerGoalRow, sqlx::Error> {
    sqlx::query("INSERT INTO career_goals (student_id) VALUES ($1) ON CONFLICT (student_id) DO NOTHING")
        .bind(student_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query_as::<_, CareerGoalRow>(LOCK_GOAL_SQL)
        .bind(student_id)
        .fetch_one(&mut **tx)
        .await
}

/// Writes both target lists of a goal locked by [`lock_goal`].
pub async fn save_targets(
    tx: &mut Transaction<'_, Postgres>,
    student_id: Uuid,
    roles: Vec<String>,
    industries: Vec<String>,
) -> Result<CareerGoalRow, sqlx::Error> {
    sqlx::query_as::<_, CareerGoalRow>(
        r#"
        UPDATE career_goals
        SET target_roles = $2, target_industries = $3, updated_at = now()
        WHERE student_id = $1
        RETURNING *
        "#,
    )
    .bind(student_id)
    .bind(roles)
    .bind(industries)
    .fetch_one(&mut **tx)
    .await
}
