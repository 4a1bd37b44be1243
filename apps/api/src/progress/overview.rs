//! Monthly performance overview.
//!
//! `build_overview` is rebuilt from scratch on every request: rows outside
//! the requested month are ignored, so a month switch never mixes in values
//! from the month shown before.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::activity::{JobApplicationRow, NetworkingInteractionRow};
use crate::models::goal::CareerGoalRow;
use crate::models::interview::MockInterviewRow;
use crate::models::month::Month;
use crate::models::office_hours::OfficeHoursRow;
use crate::models::review::{AttentionLevel, PerformanceRating, PerformanceReviewRow};
use crate::scoring::thresholds::{application_score, networking_score};

#[derive(Debug, Clone, Default)]
pub struct OverviewInputs {
    pub goal: Option<CareerGoalRow>,
    pub applications: Vec<JobApplicationRow>,
    pub networking: Vec<NetworkingInteractionRow>,
    pub interviews: Vec<MockInterviewRow>,
    pub office_hours: Vec<OfficeHoursRow>,
    pub review: Option<PerformanceReviewRow>,
    pub previous_review: Option<PerformanceReviewRow>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ActivityCounts {
    pub applications: u32,
    pub networking: u32,
    pub mock_interviews: u32,
    pub office_hours_sessions: u32,
    pub office_hours_minutes: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GoalProgress {
    pub target: u32,
    pub actual: u32,
    /// Capped at 100.
    pub percent: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SuggestedScores {
    pub application_effectiveness: f64,
    pub networking_capability: f64,
    pub highest_attention_thresholds: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReviewSummary {
    pub resume_quality: f64,
    pub application_effectiveness: f64,
    pub behavioral_performance: f64,
    pub networking_capability: f64,
    pub technical_proficiency: f64,
    pub energy_level: f64,
    pub average: f64,
    pub attention_level: AttentionLevel,
    pub performance_rating: PerformanceRating,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PerformanceOverview {
    pub month: Month,
    pub counts: ActivityCounts,
    pub application_statuses: BTreeMap<String, u32>,
    pub application_goal: Option<GoalProgress>,
    pub networking_goal: Option<GoalProgress>,
    pub average_interview_rating: Option<f64>,
    pub suggested_scores: SuggestedScores,
    pub review: Option<ReviewSummary>,
}

/// Target for the month: the monthly goal if set, else the weekly goal
/// scaled by the number of weeks in the month.
pub fn monthly_target(month: Month, weekly: i32, monthly: i32) -> Option<u32> {
    if monthly > 0 {
        return Some(monthly as u32);
    }
    if weekly > 0 {
        let weeks = month.days() as f64 / 7.0;
        return Some((weekly as f64 * weeks).round() as u32);
    }
    None
}

fn progress(target: Option<u32>, actual: u32) -> Option<GoalProgress> {
    target.filter(|t| *t > 0).map(|target| GoalProgress {
        target,
        actual,
        percent: ((actual as u64 * 100) / target as u64).min(100) as u32,
    })
}

fn summarize(review: &PerformanceReviewRow) -> ReviewSummary {
    let ratings = [
        review.resume_quality,
        review.application_effectiveness,
        review.behavioral_performance,
        review.networking_capability,
        review.technical_proficiency,
        review.energy_level,
    ];
    ReviewSummary {
        resume_quality: review.resume_quality,
        application_effectiveness: review.application_effectiveness,
        behavioral_performance: review.behavioral_performance,
        networking_capability: review.networking_capability,
        technical_proficiency: review.technical_proficiency,
        energy_level: review.energy_level,
        average: ratings.iter().sum::<f64>() / ratings.len() as f64,
        attention_level: review.attention_level,
        performance_rating: review.performance_rating,
    }
}

fn count<T>(rows: &[T], in_month: impl Fn(&T) -> bool) -> u32 {
    rows.iter().filter(|r| in_month(r)).count() as u32
}

pub fn build_overview(month: Month, inputs: &OverviewInputs) -> PerformanceOverview {
    let applications: Vec<&JobApplicationRow> = inputs
        .applications
        .iter()
        .filter(|a| month.contains(a.applied_on))
        .collect();
    let interviews: Vec<&MockInterviewRow> = inputs
        .interviews
        .iter()
        .filter(|i| month.contains(i.interview_date))
        .collect();
    let sessions: Vec<&OfficeHoursRow> = inputs
        .office_hours
        .iter()
        .filter(|o| month.contains(o.session_date))
        .collect();

    let counts = ActivityCounts {
        applications: applications.len() as u32,
        networking: count(&inputs.networking, |n| month.contains(n.occurred_on)),
        mock_interviews: interviews.len() as u32,
        office_hours_sessions: sessions.len() as u32,
        office_hours_minutes: sessions
            .iter()
            .map(|s| s.duration_minutes.max(0) as u32)
            .sum(),
    };

    let mut application_statuses = BTreeMap::new();
    for app in &applications {
        if let Some(key) = serde_json::to_value(app.status)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
        {
            *application_statuses.entry(key).or_insert(0) += 1;
        }
    }

    let (application_goal, networking_goal) = match &inputs.goal {
        Some(goal) => (
            progress(
                monthly_target(month, goal.weekly_application_goal, goal.monthly_application_goal),
                counts.applications,
            ),
            progress(
                monthly_target(month, goal.weekly_networking_goal, goal.monthly_networking_goal),
                counts.networking,
            ),
        ),
        None => (None, None),
    };

    let average_interview_rating = if interviews.is_empty() {
        None
    } else {
        Some(interviews.iter().map(|i| i.overall_rating).sum::<f64>() / interviews.len() as f64)
    };

    let highest_attention = inputs
        .previous_review
        .as_ref()
        .is_some_and(|r| r.attention_level == AttentionLevel::Highest);

    let review = inputs
        .review
        .as_ref()
        .filter(|r| r.month == month.first_day())
        .map(summarize);

    PerformanceOverview {
        month,
        suggested_scores: SuggestedScores {
            application_effectiveness: application_score(counts.applications, highest_attention),
            networking_capability: networking_score(counts.networking, highest_attention),
            highest_attention_thresholds: highest_attention,
        },
        counts,
        application_statuses,
        application_goal,
        networking_goal,
        average_interview_rating,
        review,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::ApplicationStatus;
    use crate::models::interview::InterviewType;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn application(on: NaiveDate, status: ApplicationStatus) -> JobApplicationRow {
        JobApplicationRow {
            id: Uuid::new_v4(),
            student_id: Uuid::nil(),
            company: "Acme".to_string(),
            role_title: "SWE".to_string(),
            status,
            applied_on: on,
            job_url: None,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn interaction(on: NaiveDate) -> NetworkingInteractionRow {
        NetworkingInteractionRow {
            id: Uuid::new_v4(),
            student_id: Uuid::nil(),
            contact_name: "Lee".to_string(),
            company: None,
            interaction_type: "coffee chat".to_string(),
            occurred_on: on,
            follow_up_on: None,
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    fn interview(on: NaiveDate, rating: f64) -> MockInterviewRow {
        MockInterviewRow {
            id: Uuid::new_v4(),
            student_id: Uuid::nil(),
            interview_date: on,
            interview_type: InterviewType::Technical,
            interviewer: "Kim".to_string(),
            overall_rating: rating,
            strengths: vec![],
            improvements: vec![],
            recording_url: None,
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    fn session(on: NaiveDate, minutes: i32) -> OfficeHoursRow {
        OfficeHoursRow {
            id: Uuid::new_v4(),
            student_id: Uuid::nil(),
            session_date: on,
            duration_minutes: minutes,
            topics: vec![],
            action_items: vec![],
            notes: String::new(),
            created_by: None,
            created_at: Utc::now(),
        }
    }

    fn goal(weekly_apps: i32, monthly_apps: i32, monthly_net: i32) -> CareerGoalRow {
        CareerGoalRow {
            id: Uuid::new_v4(),
            student_id: Uuid::nil(),
            target_roles: vec![],
            target_industries: vec![],
            weekly_application_goal: weekly_apps,
            weekly_networking_goal: 0,
            monthly_application_goal: monthly_apps,
            monthly_networking_goal: monthly_net,
            campaign_start: None,
            campaign_end: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn review(month: Month, attention: AttentionLevel) -> PerformanceReviewRow {
        PerformanceReviewRow {
            id: Uuid::new_v4(),
            student_id: Uuid::nil(),
            month: month.first_day(),
            resume_quality: 3.0,
            application_effectiveness: 3.0,
            behavioral_performance: 3.0,
            networking_capability: 3.0,
            technical_proficiency: 3.0,
            energy_level: 3.0,
            attention_level: attention,
            performance_rating: PerformanceRating::Medium,
            notes: String::new(),
            reviewer_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn march() -> Month {
        "2025-03".parse().unwrap()
    }

    #[test]
    fn test_counts_only_the_requested_month() {
        let inputs = OverviewInputs {
            applications: vec![
                application(date(2025, 3, 1), ApplicationStatus::Applied),
                application(date(2025, 3, 31), ApplicationStatus::Offer),
                application(date(2025, 2, 28), ApplicationStatus::Applied),
            ],
            networking: vec![interaction(date(2025, 3, 5)), interaction(date(2025, 4, 1))],
            interviews: vec![interview(date(2025, 3, 9), 6.0), interview(date(2025, 3, 20), 8.0)],
            office_hours: vec![session(date(2025, 3, 2), 30), session(date(2025, 3, 16), 45)],
            ..Default::default()
        };
        let o = build_overview(march(), &inputs);
        assert_eq!(
            o.counts,
            ActivityCounts {
                applications: 2,
                networking: 1,
                mock_interviews: 2,
                office_hours_sessions: 2,
                office_hours_minutes: 75,
            }
        );
        assert_eq!(o.application_statuses.get("offer"), Some(&1));
        assert_eq!(o.application_statuses.get("applied"), Some(&1));
        assert_eq!(o.average_interview_rating, Some(7.0));
    }

    #[test]
    fn test_switching_month_replaces_everything() {
        let feb: Month = "2025-02".parse().unwrap();
        let inputs = OverviewInputs {
            applications: vec![application(date(2025, 2, 10), ApplicationStatus::Applied)],
            interviews: vec![interview(date(2025, 2, 11), 9.0)],
            review: Some(review(feb, AttentionLevel::Low)),
            ..Default::default()
        };
        let shown_feb = build_overview(feb, &inputs);
        assert_eq!(shown_feb.counts.applications, 1);
        assert!(shown_feb.review.is_some());

        let shown_mar = build_overview(march(), &inputs);
        assert_eq!(shown_mar.month, march());
        assert_eq!(shown_mar.counts, ActivityCounts::default());
        assert!(shown_mar.application_statuses.is_empty());
        assert!(shown_mar.average_interview_rating.is_none());
        assert!(shown_mar.review.is_none());
    }

    #[test]
    fn test_goal_progress_prefers_monthly_and_caps() {
        let inputs = OverviewInputs {
            goal: Some(goal(5, 2, 0)),
            applications: vec![
                application(date(2025, 3, 3), ApplicationStatus::Applied),
                application(date(2025, 3, 4), ApplicationStatus::Applied),
                application(date(2025, 3, 5), ApplicationStatus::Applied),
            ],
            ..Default::default()
        };
        let o = build_overview(march(), &inputs);
        let p = o.application_goal.unwrap();
        assert_eq!(p.target, 2);
        assert_eq!(p.percent, 100);
        assert!(o.networking_goal.is_none());
    }

    #[test]
    fn test_weekly_goal_scaled_to_month() {
        // 31 days / 7 * 10 = 44.3 -> 44
        assert_eq!(monthly_target(march(), 10, 0), Some(44));
        let feb: Month = "2025-02".parse().unwrap();
        assert_eq!(monthly_target(feb, 10, 0), Some(40));
        assert_eq!(monthly_target(feb, 0, 0), None);
    }

    #[test]
    fn test_suggested_scores_follow_previous_attention() {
        let apps: Vec<_> = (1..=20)
            .map(|d| application(date(2025, 3, d), ApplicationStatus::Applied))
            .collect();
        let standard = build_overview(
            march(),
            &OverviewInputs {
                applications: apps.clone(),
                ..Default::default()
            },
        );
        assert_eq!(standard.suggested_scores.application_effectiveness, 3.0);

        let strict = build_overview(
            march(),
            &OverviewInputs {
                applications: apps,
                previous_review: Some(review(march().previous(), AttentionLevel::Highest)),
                ..Default::default()
            },
        );
        assert!(strict.suggested_scores.highest_attention_thresholds);
        assert_eq!(strict.suggested_scores.application_effectiveness, 2.0);
    }

    #[test]
    fn test_review_summary_average() {
        let inputs = OverviewInputs {
            review: Some(review(march(), AttentionLevel::Medium)),
            ..Default::default()
        };
        let summary = build_overview(march(), &inputs).review.unwrap();
        assert!((summary.average - 3.0).abs() < f64::EPSILON);
    }
}
