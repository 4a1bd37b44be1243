use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::activity::store::{count_applications_in_month, count_networking_in_month};
use crate::interviews::store::latest_behavioral_rating;
use crate::models::month::Month;
use crate::models::review::{AttentionLevel, PerformanceRating, PerformanceReviewRow};
use crate::reviews::store::get_review;
use crate::scoring::thresholds::{application_score, networking_score};

pub const DEFAULT_RESUME_QUALITY: f64 = 1.0;
pub const DEFAULT_TECHNICAL_PROFICIENCY: f64 = 3.0;
pub const DEFAULT_BEHAVIORAL_PERFORMANCE: f64 = 1.0;
pub const DEFAULT_ENERGY_LEVEL: f64 = 3.0;

/// Everything the seed derivation looks at.
#[derive(Debug, Clone, Default)]
pub struct SeedInputs {
    pub previous: Option<PerformanceReviewRow>,
    pub application_count: u32,
    pub networking_count: u32,
    /// Overall rating (0–10) of the most recent behavioral mock interview.
    pub latest_behavioral_rating: Option<f64>,
}

/// Where a seeded value came from.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeedSource {
    PreviousReview,
    MockInterview,
    ActivityCounts,
    Default,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedSources {
    pub resume_quality: SeedSource,
    pub behavioral_performance: SeedSource,
    pub technical_proficiency: SeedSource,
    pub energy_level: SeedSource,
}

/// Default values for a new monthly review form.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewSeed {
    pub month: Month,
    pub resume_quality: f64,
    pub application_effectiveness: f64,
    pub behavioral_performance: f64,
    pub networking_capability: f64,
    pub technical_proficiency: f64,
    pub energy_level: f64,
    pub attention_level: AttentionLevel,
    pub performance_rating: PerformanceRating,
    pub notes: String,
    pub application_count: u32,
    pub networking_count: u32,
    pub highest_attention_thresholds: bool,
    pub sources: SeedSources,
}

/// Derives the seed. Pure: the same inputs always give the same seed.
pub fn derive_seed(month: Month, inputs: &SeedInputs) -> ReviewSeed {
    let previous = inputs.previous.as_ref();
    let highest_attention =
        previous.is_some_and(|p| p.attention_level == AttentionLevel::Highest);

    let (resume_quality, resume_source) =
        carry_forward(previous.map(|p| p.resume_quality), DEFAULT_RESUME_QUALITY);
    let (technical_proficiency, technical_source) = carry_forward(
        previous.map(|p| p.technical_proficiency),
        DEFAULT_TECHNICAL_PROFICIENCY,
    );
    let (energy_level, energy_source) =
        carry_forward(previous.map(|p| p.energy_level), DEFAULT_ENERGY_LEVEL);

    let (behavioral_performance, behavioral_source) = match inputs.latest_behavioral_rating {
        Some(rating) => (rating.clamp(0.0, 10.0) / 2.0, SeedSource::MockInterview),
        None => carry_forward(
            previous.map(|p| p.behavioral_performance),
            DEFAULT_BEHAVIORAL_PERFORMANCE,
        ),
    };

    ReviewSeed {
        month,
        resume_quality,
        application_effectiveness: application_score(inputs.application_count, highest_attention),
        behavioral_performance,
        networking_capability: networking_score(inputs.networking_count, highest_attention),
        technical_proficiency,
        energy_level,
        attention_level: previous
            .map(|p| p.attention_level)
            .unwrap_or(AttentionLevel::Medium),
        performance_rating: PerformanceRating::Medium,
        notes: String::new(),
        application_count: inputs.application_count,
        networking_count: inputs.networking_count,
        highest_attention_thresholds: highest_attention,
        sources: SeedSources {
            resume_quality: resume_source,
            behavioral_performance: behavioral_source,
            technical_proficiency: technical_source,
            energy_level: energy_source,
        },
    }
}

fn carry_forward(previous: Option<f64>, default: f64) -> (f64, SeedSource) {
    match previous {
        Some(v) => (v.clamp(0.0, 5.0), SeedSource::PreviousReview),
        None => (default, SeedSource::Default),
    }
}

/// Loads the prior-month review and this month's counts for a student.
pub async fn load_seed_inputs(
    pool: &PgPool,
    student_id: Uuid,
    month: Month,
) -> Result<SeedInputs, sqlx::Error> {
    let previous = get_review(pool, student_id, month.previous()).await?;
    let application_count = count_applications_in_month(pool, student_id, month).await?;
    let networking_count = count_networking_in_month(pool, student_id, month).await?;
    let latest_behavioral_rating = latest_behavioral_rating(pool, student_id, month).await?;

    Ok(SeedInputs {
        previous,
        application_count,
        networking_count,
        latest_behavioral_rating,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn month() -> Month {
        "2025-04".parse().unwrap()
    }

    fn previous_review(attention: AttentionLevel) -> PerformanceReviewRow {
        PerformanceReviewRow {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            month: "2025-03".parse::<Month>().unwrap().first_day(),
            resume_quality: 4.0,
            application_effectiveness: 2.0,
            behavioral_performance: 3.5,
            networking_capability: 2.0,
            technical_proficiency: 4.5,
            energy_level: 2.0,
            attention_level: attention,
            performance_rating: PerformanceRating::Outstanding,
            notes: "steady".to_string(),
            reviewer_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_history_uses_fallback_constants() {
        let seed = derive_seed(month(), &SeedInputs::default());
        assert_eq!(seed.resume_quality, 1.0);
        assert_eq!(seed.technical_proficiency, 3.0);
        assert_eq!(seed.energy_level, 3.0);
        assert_eq!(seed.behavioral_performance, 1.0);
        assert_eq!(seed.application_effectiveness, 1.0);
        assert_eq!(seed.networking_capability, 1.0);
        assert_eq!(seed.attention_level, AttentionLevel::Medium);
        assert_eq!(seed.sources.resume_quality, SeedSource::Default);
        assert!(!seed.highest_attention_thresholds);
    }

    #[test]
    fn test_carries_forward_previous_values() {
        let inputs = SeedInputs {
            previous: Some(previous_review(AttentionLevel::High)),
            ..Default::default()
        };
        let seed = derive_seed(month(), &inputs);
        assert_eq!(seed.resume_quality, 4.0);
        assert_eq!(seed.technical_proficiency, 4.5);
        assert_eq!(seed.energy_level, 2.0);
        assert_eq!(seed.behavioral_performance, 3.5);
        assert_eq!(seed.attention_level, AttentionLevel::High);
        assert_eq!(seed.sources.behavioral_performance, SeedSource::PreviousReview);
    }

    #[test]
    fn test_mock_interview_overrides_behavioral() {
        let inputs = SeedInputs {
            previous: Some(previous_review(AttentionLevel::Low)),
            latest_behavioral_rating: Some(7.0),
            ..Default::default()
        };
        let seed = derive_seed(month(), &inputs);
        assert_eq!(seed.behavioral_performance, 3.5);
        assert_eq!(seed.sources.behavioral_performance, SeedSource::MockInterview);
    }

    #[test]
    fn test_out_of_range_interview_rating_is_clamped() {
        let inputs = SeedInputs {
            latest_behavioral_rating: Some(14.0),
            ..Default::default()
        };
        assert_eq!(derive_seed(month(), &inputs).behavioral_performance, 5.0);
    }

    #[test]
    fn test_highest_attention_uses_strict_tables() {
        let counts = SeedInputs {
            application_count: 50,
            networking_count: 12,
            ..Default::default()
        };
        let standard = derive_seed(month(), &counts);
        assert_eq!(standard.application_effectiveness, 5.0);
        assert_eq!(standard.networking_capability, 5.0);

        let flagged = SeedInputs {
            previous: Some(previous_review(AttentionLevel::Highest)),
            ..counts
        };
        let strict = derive_seed(month(), &flagged);
        assert!(strict.highest_attention_thresholds);
        assert_eq!(strict.application_effectiveness, 3.0);
        assert_eq!(strict.networking_capability, 4.0);
    }

    #[test]
    fn test_performance_rating_and_notes_reset() {
        let inputs = SeedInputs {
            previous: Some(previous_review(AttentionLevel::Medium)),
            ..Default::default()
        };
        let seed = derive_seed(month(), &inputs);
        assert_eq!(seed.performance_rating, PerformanceRating::Medium);
        assert!(seed.notes.is_empty());
    }
}
