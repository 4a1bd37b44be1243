pub mod handlers;
pub mod store;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::AppError;
use crate::interviews::validation::clean_list;

/// Longest session we accept, in minutes.
pub const MAX_SESSION_MINUTES: i32 = 8 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct OfficeHoursInput {
    pub session_date: NaiveDate,
    pub duration_minutes: i32,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

pub fn validate_office_hours(input: OfficeHoursInput) -> Result<OfficeHoursInput, AppError> {
    if input.duration_minutes <= 0 {
        return Err(AppError::Validation(
            "duration_minutes must be positive".to_string(),
        ));
    }
    if input.duration_minutes > MAX_SESSION_MINUTES {
        return Err(AppError::Validation(format!(
            "duration_minutes cannot exceed {MAX_SESSION_MINUTES}"
        )));
    }
    Ok(OfficeHoursInput {
        topics: clean_list(&input.topics),
        action_items: clean_list(&input.action_items),
        notes: input.notes.trim().to_string(),
        ..input
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(minutes: i32) -> OfficeHoursInput {
        OfficeHoursInput {
            session_date: NaiveDate::from_ymd_opt(2025, 2, 14).unwrap(),
            duration_minutes: minutes,
            topics: vec!["salary negotiation".to_string(), "".to_string()],
            action_items: vec![" send follow-up ".to_string()],
            notes: "".to_string(),
        }
    }

    #[test]
    fn test_zero_duration_rejected() {
        assert!(validate_office_hours(input(0)).is_err());
    }

    #[test]
    fn test_overlong_duration_rejected() {
        assert!(validate_office_hours(input(MAX_SESSION_MINUTES + 1)).is_err());
    }

    #[test]
    fn test_lists_cleaned() {
        let v = validate_office_hours(input(45)).unwrap();
        assert_eq!(v.topics, vec!["salary negotiation".to_string()]);
        assert_eq!(v.action_items, vec!["send follow-up".to_string()]);
    }
}
