// Job applications and networking interactions: the raw activity behind the
// monthly scores.

pub mod handlers;
pub mod store;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::activity::ApplicationStatus;

#[derive(Debug, Clone, Deserialize)]
pub struct JobApplicationInput {
    pub company: String,
    pub role_title: String,
    #[serde(default = "default_status")]
    pub status: ApplicationStatus,
    pub applied_on: NaiveDate,
    pub job_url: Option<String>,
    #[serde(default)]
    pub notes: String,
}

fn default_status() -> ApplicationStatus {
    ApplicationStatus::Applied
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkingInput {
    pub contact_name: String,
    pub company: Option<String>,
    pub interaction_type: String,
    pub occurred_on: NaiveDate,
    pub follow_up_on: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

fn required(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn validate_application(input: JobApplicationInput) -> Result<JobApplicationInput, AppError> {
    Ok(JobApplicationInput {
        company: required("company", &input.company)?,
        role_title: required("role_title", &input.role_title)?,
        job_url: optional(input.job_url),
        notes: input.notes.trim().to_string(),
        ..input
    })
}

pub fn validate_networking(input: NetworkingInput) -> Result<NetworkingInput, AppError> {
    if let Some(follow_up) = input.follow_up_on {
        if follow_up < input.occurred_on {
            return Err(AppError::Validation(
                "follow_up_on must not be before occurred_on".to_string(),
            ));
        }
    }
    Ok(NetworkingInput {
        contact_name: required("contact_name", &input.contact_name)?,
        interaction_type: required("interaction_type", &input.interaction_type)?,
        company: optional(input.company),
        notes: input.notes.trim().to_string(),
        ..input
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_application_requires_company() {
        let input = JobApplicationInput {
            company: "  ".to_string(),
            role_title: "SWE".to_string(),
            status: ApplicationStatus::Applied,
            applied_on: date(3),
            job_url: None,
            notes: String::new(),
        };
        assert!(validate_application(input).is_err());
    }

    #[test]
    fn test_application_status_defaults_to_applied() {
        let input: JobApplicationInput = serde_json::from_str(
            r#"{"company":"Acme","role_title":"SWE","applied_on":"2025-03-03","job_url":""}"#,
        )
        .unwrap();
        let v = validate_application(input).unwrap();
        assert_eq!(v.status, ApplicationStatus::Applied);
        assert!(v.job_url.is_none());
    }

    #[test]
    fn test_follow_up_before_interaction_rejected() {
        let input = NetworkingInput {
            contact_name: "Sam".to_string(),
            company: Some(" ".to_string()),
            interaction_type: "coffee chat".to_string(),
            occurred_on: date(10),
            follow_up_on: Some(date(9)),
            notes: String::new(),
        };
        assert!(validate_networking(input).is_err());
    }

    #[test]
    fn test_networking_blank_company_dropped() {
        let input = NetworkingInput {
            contact_name: " Sam ".to_string(),
            company: Some(" ".to_string()),
            interaction_type: "referral".to_string(),
            occurred_on: date(10),
            follow_up_on: Some(date(17)),
            notes: String::new(),
        };
        let v = validate_networking(input).unwrap();
        assert_eq!(v.contact_name, "Sam");
        assert!(v.company.is_none());
    }
}
