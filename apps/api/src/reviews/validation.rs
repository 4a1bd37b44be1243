use serde::Deserialize;

use crate::errors::AppError;
use crate::models::review::{AttentionLevel, PerformanceRating};

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    pub resume_quality: f64,
    pub application_effectiveness: f64,
    pub behavioral_performance: f64,
    pub networking_capability: f64,
    pub technical_proficiency: f64,
    pub energy_level: f64,
    pub attention_level: AttentionLevel,
    pub performance_rating: PerformanceRating,
    #[serde(default)]
    pub notes: String,
}

/// Rejects non-finite ratings and clamps the rest into `[0, 5]`.
pub fn normalize_review(mut input: ReviewInput) -> Result<ReviewInput, AppError> {
    for (name, rating) in [
        ("resume_quality", &mut input.resume_quality),
        ("application_effectiveness", &mut input.application_effectiveness),
        ("behavioral_performance", &mut input.behavioral_performance),
        ("networking_capability", &mut input.networking_capability),
        ("technical_proficiency", &mut input.technical_proficiency),
        ("energy_level", &mut input.energy_level),
    ] {
        if !rating.is_finite() {
            return Err(AppError::Validation(format!("{name} must be a number")));
        }
        *rating = rating.clamp(MIN_RATING, MAX_RATING);
    }
    input.notes = input.notes.trim().to_string();
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ReviewInput {
        ReviewInput {
            resume_quality: 3.0,
            application_effectiveness: 2.0,
            behavioral_performance: 4.0,
            networking_capability: 1.0,
            technical_proficiency: 3.5,
            energy_level: 3.0,
            attention_level: AttentionLevel::High,
            performance_rating: PerformanceRating::Medium,
            notes: "  keep going  ".to_string(),
        }
    }

    #[test]
    fn test_in_range_values_untouched() {
        let r = normalize_review(input()).unwrap();
        assert_eq!(r.technical_proficiency, 3.5);
        assert_eq!(r.notes, "keep going");
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let mut raw = input();
        raw.energy_level = 9.0;
        raw.resume_quality = -2.0;
        let r = normalize_review(raw).unwrap();
        assert_eq!(r.energy_level, 5.0);
        assert_eq!(r.resume_quality, 0.0);
    }

    #[test]
    fn test_nan_rejected() {
        let mut raw = input();
        raw.networking_capability = f64::NAN;
        assert!(matches!(normalize_review(raw), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_enums_deserialize_snake_case() {
        let json = r#"{
            "resume_quality": 1, "application_effectiveness": 1,
            "behavioral_performance": 1, "networking_capability": 1,
            "technical_proficiency": 1, "energy_level": 1,
            "attention_level": "highest", "performance_rating": "red_flag"
        }"#;
        let r: ReviewInput = serde_json::from_str(json).unwrap();
        assert_eq!(r.attention_level, AttentionLevel::Highest);
        assert_eq!(r.performance_rating, PerformanceRating::RedFlag);
        assert!(r.notes.is_empty());
    }
}
