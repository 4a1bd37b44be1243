use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OfficeHoursRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub session_date: NaiveDate,
    pub duration_minutes: i32,
    pub topics: Vec<String>,
    pub action_items: Vec<String>,
    pub notes: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
