use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::goals::store::{get_goal, lock_goal, save_targets, upsert_goal};
use crate::goals::targets::{apply_edit, validate_goal, CareerGoalInput, TargetEdit, TargetList};
use crate::models::goal::CareerGoalRow;
use crate::selection::generation::ensure_current;
use crate::selection::PanelQuery;
use crate::state::AppState;
use crate::viewer::{Access, Viewer};

/// GET /api/v1/students/:student_id/goals
pub async fn handle_get_goal(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(student_id): Path<Uuid>,
    Query(params): Query<PanelQuery>,
) -> Result<Json<Option<CareerGoalRow>>, AppError> {
    viewer.authorize(student_id, Access::Read)?;
    let goal = get_goal(&state.db, student_id).await?;
    ensure_current(&state.redis, viewer.id, params.generation).await?;
    Ok(Json(goal))
}

/// PUT /api/v1/students/:student_id/goals
pub async fn handle_put_goal(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(student_id): Path<Uuid>,
    Json(input): Json<CareerGoalInput>,
) -> Result<Json<CareerGoalRow>, AppError> {
    viewer.authorize(student_id, Access::OwnerWrite)?;
    let goal = validate_goal(&input)?;
    let row = upsert_goal(&state.db, student_id, goal).await?;
    info!("Saved career goal for student {student_id}");
    Ok(Json(row))
}

/// PATCH /api/v1/students/:student_id/goals/targets
///
/// Adds or removes a single target role or industry.
pub async fn handle_edit_targets(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(student_id): Path<Uuid>,
    Json(edit): Json<TargetEdit>,
) -> Result<Json<CareerGoalRow>, AppError> {
    viewer.authorize(student_id, Access::OwnerWrite)?;

    let mut tx = state.db.begin().await?;
    let goal = lock_goal(&mut tx, student_id).await?;
    let mut roles = TargetList::from_stored(goal.target_roles);
    let mut industries = TargetList::from_stored(goal.target_industries);

    apply_edit(&mut roles, &mut industries, &edit)?;

    let row = save_targets(
        &mut tx,
        student_id,
        roles.into_inner(),
        industries.into_inner(),
    )
    .await?;
    tx.commit().await?;

    info!(
        "Updated {} for student {student_id}",
        edit.kind.label()
    );
    Ok(Json(row))
}
