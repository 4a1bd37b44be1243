use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "attention_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AttentionLevel {
    Low,
    Medium,
    High,
    Highest,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "performance_rating", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PerformanceRating {
    Outstanding,
    Medium,
    RedFlag,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PerformanceReviewRow {
    pub id: Uuid,
    pub student_id: Uuid,
    /// First day of the reviewed month.
    pub month: NaiveDate,
    pub resume_quality: f64,
    pub application_effectiveness: f64,
    pub behavioral_performance: f64,
    pub networking_capability: f64,
    pub technical_proficiency: f64,
    pub energy_level: f64,
    pub attention_level: AttentionLevel,
    pub performance_rating: PerformanceRating,
    pub notes: String,
    pub reviewer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
