use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Screening,
    Interviewing,
    Offer,
    Rejected,
    Withdrawn,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobApplicationRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub company: String,
    pub role_title: String,
    pub status: ApplicationStatus,
    pub applied_on: NaiveDate,
    pub job_url: Option<String>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NetworkingInteractionRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub contact_name: String,
    pub company: Option<String>,
    pub interaction_type: String,
    pub occurred_on: NaiveDate,
    pub follow_up_on: Option<NaiveDate>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}
