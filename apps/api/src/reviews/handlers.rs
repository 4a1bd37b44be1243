use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::month::Month;
use crate::models::review::PerformanceReviewRow;
use crate::reviews::store::{delete_review, get_review, list_reviews, upsert_review};
use crate::reviews::validation::{normalize_review, ReviewInput};
use crate::scoring::seed::{derive_seed, load_seed_inputs, ReviewSeed};
use crate::selection::generation::ensure_current;
use crate::selection::PanelQuery;
use crate::state::AppState;
use crate::viewer::{Access, Viewer};

/// GET /api/v1/students/:student_id/reviews
pub async fn handle_list_reviews(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(student_id): Path<Uuid>,
    Query(params): Query<PanelQuery>,
) -> Result<Json<Vec<PerformanceReviewRow>>, AppError> {
    viewer.authorize(student_id, Access::Read)?;
    let reviews = list_reviews(&state.db, student_id).await?;
    ensure_current(&state.redis, viewer.id, params.generation).await?;
    Ok(Json(reviews))
}

/// GET /api/v1/students/:student_id/reviews/:month
pub async fn handle_get_review(
    State(state): State<AppState>,
    viewer: Viewer,
    Path((student_id, month)): Path<(Uuid, Month)>,
    Query(params): Query<PanelQuery>,
) -> Result<Json<PerformanceReviewRow>, AppError> {
    viewer.authorize(student_id, Access::Read)?;
    let review = get_review(&state.db, student_id, month)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No review for {month}")))?;
    ensure_current(&state.redis, viewer.id, params.generation).await?;
    Ok(Json(review))
}

/// GET /api/v1/students/:student_id/reviews/:month/seed
///
/// Default values for a new review, derived from the previous month's review
/// and this month's activity.
pub async fn handle_review_seed(
    State(state): State<AppState>,
    viewer: Viewer,
    Path((student_id, month)): Path<(Uuid, Month)>,
    Query(params): Query<PanelQuery>,
) -> Result<Json<ReviewSeed>, AppError> {
    viewer.require_staff()?;
    let inputs = load_seed_inputs(&state.db, student_id, month).await?;
    let seed = derive_seed(month, &inputs);
    ensure_current(&state.redis, viewer.id, params.generation).await?;
    Ok(Json(seed))
}

/// PUT /api/v1/students/:student_id/reviews/:month
pub async fn handle_put_review(
    State(state): State<AppState>,
    viewer: Viewer,
    Path((student_id, month)): Path<(Uuid, Month)>,
    Json(input): Json<ReviewInput>,
) -> Result<Json<PerformanceReviewRow>, AppError> {
    viewer.authorize(student_id, Access::StaffWrite)?;
    let review = normalize_review(input)?;
    let row = upsert_review(&state.db, student_id, month, viewer.id, &review).await?;
    info!("Saved {month} review for student {student_id} by {}", viewer.id);
    Ok(Json(row))
}

/// DELETE /api/v1/students/:student_id/reviews/:month
pub async fn handle_delete_review(
    State(state): State<AppState>,
    viewer: Viewer,
    Path((student_id, month)): Path<(Uuid, Month)>,
) -> Result<StatusCode, AppError> {
    viewer.authorize(student_id, Access::StaffWrite)?;
    if !delete_review(&state.db, student_id, month).await? {
        return Err(AppError::NotFound(format!("No review for {month}")));
    }
    info!("Deleted {month} review for student {student_id}");
    Ok(StatusCode::NO_CONTENT)
}
