use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interviews::store::{
    create_interview, delete_interview, get_interview, list_interviews, update_interview,
};
use crate::interviews::validation::{validate_interview, MockInterviewInput};
use crate::models::interview::MockInterviewRow;
use crate::selection::generation::ensure_current;
use crate::selection::PanelQuery;
use crate::state::AppState;
use crate::viewer::{Access, Viewer};

/// GET /api/v1/students/:student_id/interviews
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(student_id): Path<Uuid>,
    Query(params): Query<PanelQuery>,
) -> Result<Json<Vec<MockInterviewRow>>, AppError> {
    viewer.authorize(student_id, Access::Read)?;
    let interviews = list_interviews(&state.db, student_id, params.month).await?;
    ensure_current(&state.redis, viewer.id, params.generation).await?;
    Ok(Json(interviews))
}

/// POST /api/v1/students/:student_id/interviews
pub async fn handle_create_interview(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(student_id): Path<Uuid>,
    Json(input): Json<MockInterviewInput>,
) -> Result<(StatusCode, Json<MockInterviewRow>), AppError> {
    viewer.authorize(student_id, Access::StaffWrite)?;
    let input = validate_interview(input)?;
    let row = create_interview(&state.db, student_id, &input).await?;
    info!("Recorded mock interview {} for student {student_id}", row.id);
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/interviews/:id
pub async fn handle_update_interview(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
    Json(input): Json<MockInterviewInput>,
) -> Result<Json<MockInterviewRow>, AppError> {
    let existing = get_interview(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Mock interview {id} not found")))?;
    viewer.authorize(existing.student_id, Access::StaffWrite)?;

    let input = validate_interview(input)?;
    let row = update_interview(&state.db, id, &input).await?;
    info!("Updated mock interview {id}");
    Ok(Json(row))
}

/// DELETE /api/v1/interviews/:id
pub async fn handle_delete_interview(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let existing = get_interview(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Mock interview {id} not found")))?;
    viewer.authorize(existing.student_id, Access::StaffWrite)?;

    delete_interview(&state.db, id).await?;
    info!("Deleted mock interview {id}");
    Ok(StatusCode::NO_CONTENT)
}
