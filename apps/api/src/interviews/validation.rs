use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::interview::InterviewType;

pub const MAX_INTERVIEW_RATING: f64 = 10.0;

#[derive(Debug, Clone, Deserialize)]
pub struct MockInterviewInput {
    pub interview_date: NaiveDate,
    pub interview_type: InterviewType,
    #[serde(default)]
    pub interviewer: String,
    pub overall_rating: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    pub recording_url: Option<String>,
    #[serde(default)]
    pub notes: String,
}

/// Trims and drops blank entries from a free-text list.
pub fn clean_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn validate_interview(input: MockInterviewInput) -> Result<MockInterviewInput, AppError> {
    let interviewer = input.interviewer.trim().to_string();
    if interviewer.is_empty() {
        return Err(AppError::Validation("interviewer is required".to_string()));
    }
    if !input.overall_rating.is_finite() {
        return Err(AppError::Validation(
            "overall_rating must be a number".to_string(),
        ));
    }

    let recording_url = input
        .recording_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());
    if let Some(url) = &recording_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Validation(
                "recording_url must be an http(s) link".to_string(),
            ));
        }
    }

    Ok(MockInterviewInput {
        interviewer,
        overall_rating: input.overall_rating.clamp(0.0, MAX_INTERVIEW_RATING),
        strengths: clean_list(&input.strengths),
        improvements: clean_list(&input.improvements),
        recording_url,
        notes: input.notes.trim().to_string(),
        ..input
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> MockInterviewInput {
        MockInterviewInput {
            interview_date: NaiveDate::from_ymd_opt(2025, 5, 2).unwrap(),
            interview_type: InterviewType::Behavioral,
            interviewer: " Priya ".to_string(),
            overall_rating: 7.5,
            strengths: vec!["STAR structure".to_string(), " ".to_string()],
            improvements: vec![],
            recording_url: Some("https://example.com/rec/1".to_string()),
            notes: String::new(),
        }
    }

    #[test]
    fn test_interviewer_required() {
        let mut raw = input();
        raw.interviewer = "   ".to_string();
        let err = validate_interview(raw).unwrap_err();
        assert!(err.to_string().contains("interviewer"));
    }

    #[test]
    fn test_rating_clamped_to_ten() {
        let mut raw = input();
        raw.overall_rating = 12.0;
        assert_eq!(validate_interview(raw).unwrap().overall_rating, 10.0);

        let mut raw = input();
        raw.overall_rating = -1.0;
        assert_eq!(validate_interview(raw).unwrap().overall_rating, 0.0);
    }

    #[test]
    fn test_lists_and_names_cleaned() {
        let v = validate_interview(input()).unwrap();
        assert_eq!(v.interviewer, "Priya");
        assert_eq!(v.strengths, vec!["STAR structure".to_string()]);
    }

    #[test]
    fn test_blank_recording_url_dropped() {
        let mut raw = input();
        raw.recording_url = Some("  ".to_string());
        assert!(validate_interview(raw).unwrap().recording_url.is_none());
    }

    #[test]
    fn test_non_http_recording_rejected() {
        let mut raw = input();
        raw.recording_url = Some("ftp://files/rec".to_string());
        assert!(validate_interview(raw).is_err());
    }
}
