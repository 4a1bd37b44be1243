use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "interview_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    Technical,
    Behavioral,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MockInterviewRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub interview_date: NaiveDate,
    pub interview_type: InterviewType,
    pub interviewer: String,
    /// 0–10 scale.
    pub overall_rating: f64,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub recording_url: Option<String>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}
