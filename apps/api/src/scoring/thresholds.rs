//! Step tables mapping raw monthly activity counts to 1–5 scores.
//!
//! Students flagged at the highest attention level are held to stricter
//! thresholds: the same count earns an equal or lower score.

use serde::Serialize;

/// One step table: `(minimum count, score)` rows in ascending count order.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StepTable {
    pub name: &'static str,
    pub steps: &'static [(u32, f64)],
}

impl StepTable {
    /// Returns the score of the highest row whose threshold `count` meets.
    pub fn score(&self, count: u32) -> f64 {
        self.steps
            .iter()
            .rev()
            .find(|(threshold, _)| count >= *threshold)
            .map(|(_, score)| *score)
            .unwrap_or(MIN_SCORE)
    }
}

const MIN_SCORE: f64 = 1.0;

pub const APPLICATIONS_STANDARD: StepTable = StepTable {
    name: "applications_standard",
    steps: &[(0, 1.0), (10, 2.0), (20, 3.0), (35, 4.0), (50, 5.0)],
};

pub const APPLICATIONS_HIGHEST_ATTENTION: StepTable = StepTable {
    name: "applications_highest_attention",
    steps: &[(0, 1.0), (20, 2.0), (40, 3.0), (60, 4.0), (80, 5.0)],
};

pub const NETWORKING_STANDARD: StepTable = StepTable {
    name: "networking_standard",
    steps: &[(0, 1.0), (2, 2.0), (5, 3.0), (8, 4.0), (12, 5.0)],
};

pub const NETWORKING_HIGHEST_ATTENTION: StepTable = StepTable {
    name: "networking_highest_attention",
    steps: &[(0, 1.0), (4, 2.0), (8, 3.0), (12, 4.0), (16, 5.0)],
};

pub fn applications_table(highest_attention: bool) -> &'static StepTable {
    if highest_attention {
        &APPLICATIONS_HIGHEST_ATTENTION
    } else {
        &APPLICATIONS_STANDARD
    }
}

pub fn networking_table(highest_attention: bool) -> &'static StepTable {
    if highest_attention {
        &NETWORKING_HIGHEST_ATTENTION
    } else {
        &NETWORKING_STANDARD
    }
}

/// Application effectiveness score for a month's application count.
pub fn application_score(count: u32, highest_attention: bool) -> f64 {
    applications_table(highest_attention).score(count)
}

/// Networking capability score for a month's interaction count.
pub fn networking_score(count: u32, highest_attention: bool) -> f64 {
    networking_table(highest_attention).score(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TABLES: [StepTable; 4] = [
        APPLICATIONS_STANDARD,
        APPLICATIONS_HIGHEST_ATTENTION,
        NETWORKING_STANDARD,
        NETWORKING_HIGHEST_ATTENTION,
    ];

    #[test]
    fn test_tables_start_at_zero_and_ascend() {
        for table in ALL_TABLES {
            assert_eq!(table.steps[0].0, 0, "{} must cover zero", table.name);
            for pair in table.steps.windows(2) {
                assert!(pair[0].0 < pair[1].0, "{} thresholds not ascending", table.name);
                assert!(pair[0].1 < pair[1].1, "{} scores not ascending", table.name);
            }
        }
    }

    #[test]
    fn test_scores_monotonic_in_count() {
        for highest in [false, true] {
            let mut prev_app = 0.0;
            let mut prev_net = 0.0;
            for count in 0..200 {
                let app = application_score(count, highest);
                let net = networking_score(count, highest);
                assert!(app >= prev_app, "applications dropped at {count} (highest={highest})");
                assert!(net >= prev_net, "networking dropped at {count} (highest={highest})");
                assert!((1.0..=5.0).contains(&app));
                assert!((1.0..=5.0).contains(&net));
                prev_app = app;
                prev_net = net;
            }
        }
    }

    #[test]
    fn test_highest_attention_selects_strict_table() {
        assert_eq!(applications_table(true).name, "applications_highest_attention");
        assert_eq!(applications_table(false).name, "applications_standard");
        assert_eq!(networking_table(true).name, "networking_highest_attention");
        assert_eq!(networking_table(false).name, "networking_standard");
    }

    #[test]
    fn test_highest_attention_never_scores_higher() {
        for count in 0..200 {
            assert!(application_score(count, true) <= application_score(count, false));
            assert!(networking_score(count, true) <= networking_score(count, false));
        }
    }

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(application_score(9, false), 1.0);
        assert_eq!(application_score(10, false), 2.0);
        assert_eq!(application_score(50, false), 5.0);
        assert_eq!(application_score(50, true), 3.0);
        assert_eq!(networking_score(4, false), 2.0);
        assert_eq!(networking_score(4, true), 2.0);
        assert_eq!(networking_score(12, false), 5.0);
        assert_eq!(networking_score(12, true), 4.0);
    }
}
