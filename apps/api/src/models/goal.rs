use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CareerGoalRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub target_roles: Vec<String>,
    pub target_industries: Vec<String>,
    pub weekly_application_goal: i32,
    pub weekly_networking_goal: i32,
    pub monthly_application_goal: i32,
    pub monthly_networking_goal: i32,
    pub campaign_start: Option<NaiveDate>,
    pub campaign_end: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
