use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::office_hours::OfficeHoursRow;
use crate::office_hours::store::{
    create_record, delete_record, get_record, list_records, update_record,
};
use crate::office_hours::{validate_office_hours, OfficeHoursInput};
use crate::selection::generation::ensure_current;
use crate::selection::PanelQuery;
use crate::state::AppState;
use crate::viewer::{Access, Viewer};

/// GET /api/v1/students/:student_id/office-hours
pub async fn handle_list_office_hours(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(student_id): Path<Uuid>,
    Query(params): Query<PanelQuery>,
) -> Result<Json<Vec<OfficeHoursRow>>, AppError> {
    viewer.authorize(student_id, Access::Read)?;
    let records = list_records(&state.db, student_id, params.month).await?;
    ensure_current(&state.redis, viewer.id, params.generation).await?;
    Ok(Json(records))
}

/// POST /api/v1/students/:student_id/office-hours
pub async fn handle_create_office_hours(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(student_id): Path<Uuid>,
    Json(input): Json<OfficeHoursInput>,
) -> Result<(StatusCode, Json<OfficeHoursRow>), AppError> {
    viewer.authorize(student_id, Access::StaffWrite)?;
    let input = validate_office_hours(input)?;
    let row = create_record(&state.db, student_id, viewer.id, &input).await?;
    info!("Recorded office hours {} for student {student_id}", row.id);
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/office-hours/:id
pub async fn handle_update_office_hours(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
    Json(input): Json<OfficeHoursInput>,
) -> Result<Json<OfficeHoursRow>, AppError> {
    let existing = get_record(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Office hours record {id} not found")))?;
    viewer.authorize(existing.student_id, Access::StaffWrite)?;

    let input = validate_office_hours(input)?;
    let row = update_record(&state.db, id, &input).await?;
    info!("Updated office hours record {id}");
    Ok(Json(row))
}

/// DELETE /api/v1/office-hours/:id
pub async fn handle_delete_office_hours(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let existing = get_record(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Office hours record {id} not found")))?;
    viewer.authorize(existing.student_id, Access::StaffWrite)?;

    delete_record(&state.db, id).await?;
    info!("Deleted office hours record {id}");
    Ok(StatusCode::NO_CONTENT)
}
