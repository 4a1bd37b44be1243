use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::activity::store::{
    create_application, create_interaction, delete_application, delete_interaction,
    get_application, get_interaction, list_applications, list_interactions, update_application,
    update_interaction,
};
use crate::activity::{
    validate_application, validate_networking, JobApplicationInput, NetworkingInput,
};
use crate::errors::AppError;
use crate::models::activity::{JobApplicationRow, NetworkingInteractionRow};
use crate::selection::generation::ensure_current;
use crate::selection::PanelQuery;
use crate::state::AppState;
use crate::viewer::{Access, Viewer};

// ── Job applications ────────────────────────────────────────────────────────

/// GET /api/v1/students/:student_id/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(student_id): Path<Uuid>,
    Query(params): Query<PanelQuery>,
) -> Result<Json<Vec<JobApplicationRow>>, AppError> {
    viewer.authorize(student_id, Access::Read)?;
    let rows = list_applications(&state.db, student_id, params.month).await?;
    ensure_current(&state.redis, viewer.id, params.generation).await?;
    Ok(Json(rows))
}

/// POST /api/v1/students/:student_id/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(student_id): Path<Uuid>,
    Json(input): Json<JobApplicationInput>,
) -> Result<(StatusCode, Json<JobApplicationRow>), AppError> {
    viewer.authorize(student_id, Access::OwnerWrite)?;
    let input = validate_application(input)?;
    let row = create_application(&state.db, student_id, &input).await?;
    info!(
        "Logged application {} ({} @ {}) for student {student_id}",
        row.id, row.role_title, row.company
    );
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
    Json(input): Json<JobApplicationInput>,
) -> Result<Json<JobApplicationRow>, AppError> {
    let existing = get_application(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
    viewer.authorize(existing.student_id, Access::OwnerWrite)?;

    let input = validate_application(input)?;
    let row = update_application(&state.db, id, &input).await?;
    info!("Updated application {id} (status {:?})", row.status);
    Ok(Json(row))
}

/// DELETE /api/v1/applications/:id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let existing = get_application(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
    viewer.authorize(existing.student_id, Access::OwnerWrite)?;

    delete_application(&state.db, id).await?;
    info!("Deleted application {id}");
    Ok(StatusCode::NO_CONTENT)
}

// ── Networking interactions ─────────────────────────────────────────────────

/// GET /api/v1/students/:student_id/networking
pub async fn handle_list_networking(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(student_id): Path<Uuid>,
    Query(params): Query<PanelQuery>,
) -> Result<Json<Vec<NetworkingInteractionRow>>, AppError> {
    viewer.authorize(student_id, Access::Read)?;
    let rows = list_interactions(&state.db, student_id, params.month).await?;
    ensure_current(&state.redis, viewer.id, params.generation).await?;
    Ok(Json(rows))
}

/// POST /api/v1/students/:student_id/networking
pub async fn handle_create_networking(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(student_id): Path<Uuid>,
    Json(input): Json<NetworkingInput>,
) -> Result<(StatusCode, Json<NetworkingInteractionRow>), AppError> {
    viewer.authorize(student_id, Access::OwnerWrite)?;
    let input = validate_networking(input)?;
    let row = create_interaction(&state.db, student_id, &input).await?;
    info!("Logged networking interaction {} for student {student_id}", row.id);
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/networking/:id
pub async fn handle_update_networking(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
    Json(input): Json<NetworkingInput>,
) -> Result<Json<NetworkingInteractionRow>, AppError> {
    let existing = get_interaction(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Networking interaction {id} not found")))?;
    viewer.authorize(existing.student_id, Access::OwnerWrite)?;

    let input = validate_networking(input)?;
    let row = update_interaction(&state.db, id, &input).await?;
    info!("Updated networking interaction {id}");
    Ok(Json(row))
}

/// DELETE /api/v1/networking/:id
pub async fn handle_delete_networking(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let existing = get_interaction(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Networking interaction {id} not found")))?;
    viewer.authorize(existing.student_id, Access::OwnerWrite)?;

    delete_interaction(&state.db, id).await?;
    info!("Deleted networking interaction {id}");
    Ok(StatusCode::NO_CONTENT)
}
