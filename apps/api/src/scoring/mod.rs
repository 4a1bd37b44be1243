// Default ratings for a new monthly review.
// Threshold tables live in `thresholds`; seed assembly in `seed`.

pub mod seed;
pub mod thresholds;
