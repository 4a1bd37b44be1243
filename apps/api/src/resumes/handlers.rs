use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::future::Future;

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeVersionRow;
use crate::resumes::storage::{
    delete_resume, presigned_download_url, put_resume, DOWNLOAD_URL_TTL,
};
use crate::resumes::store::{
    get_version, highest_version, insert_version, list_versions, lock_student_versions,
    mark_deleted, record_decision, NewResumeVersion,
};
use crate::resumes::upload::{
    next_version, object_key, validate_decision, validate_upload, ReviewDecision,
};
use crate::selection::generation::ensure_current;
use crate::selection::PanelQuery;
use crate::state::AppState;
use crate::viewer::{Access, Viewer};

const FILE_FIELD: &str = "file";

struct UploadedFile {
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
}

async fn read_file_field(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(String::from);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
        return Ok(UploadedFile {
            file_name,
            content_type,
            data,
        });
    }
    Err(AppError::Validation(format!(
        "Missing '{FILE_FIELD}' field in upload"
    )))
}

/// Awaits `persist` (row insert and commit). If it fails, the object that
/// was already uploaded is removed; a failed removal is only logged.
async fn persist_or_discard<T>(
    persist: impl Future<Output = Result<T, sqlx::Error>>,
    discard: impl Future<Output = Result<(), AppError>>,
) -> Result<T, AppError> {
    match persist.await {
        Ok(row) => Ok(row),
        Err(e) => {
            if let Err(cleanup) = discard.await {
                warn!("Orphaned resume object: {cleanup}");
            }
            Err(e.into())
        }
    }
}

/// Soft-deletes the row first; the object goes only after that succeeded.
/// A failed object removal leaves an unreachable object and is only logged.
async fn delete_then_remove(
    mark_deleted: impl Future<Output = Result<(), sqlx::Error>>,
    remove_object: impl Future<Output = Result<(), AppError>>,
) -> Result<(), AppError> {
    mark_deleted.await?;
    if let Err(e) = remove_object.await {
        warn!("Resume row deleted but object removal failed: {e}");
    }
    Ok(())
}

/// GET /api/v1/students/:student_id/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(student_id): Path<Uuid>,
    Query(params): Query<PanelQuery>,
) -> Result<Json<Vec<ResumeVersionRow>>, AppError> {
    viewer.authorize(student_id, Access::Read)?;
    let versions = list_versions(&state.db, student_id).await?;
    ensure_current(&state.redis, viewer.id, params.generation).await?;
    Ok(Json(versions))
}

/// POST /api/v1/students/:student_id/resumes (multipart, field `file`)
///
/// Validates the file, then stores it as the next version under a
/// per-student lock.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(student_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeVersionRow>), AppError> {
    viewer.authorize(student_id, Access::OwnerWrite)?;

    let upload = read_file_field(multipart).await?;
    let accepted = validate_upload(
        &upload.file_name,
        upload.content_type.as_deref(),
        upload.data.len(),
        state.config.max_resume_bytes,
    )?;
    let size_bytes = upload.data.len() as i64;

    let mut tx = state.db.begin().await?;
    lock_student_versions(&mut tx, student_id)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound(format!("Student {student_id} not found")),
            other => other.into(),
        })?;
    let version = next_version(highest_version(&mut tx, student_id).await?);
    let key = object_key(student_id, version, &accepted.file_name);

    put_resume(
        &state.s3,
        &state.config.s3_bucket,
        &key,
        &accepted.content_type,
        upload.data,
    )
    .await?;

    let persist = async {
        let row = insert_version(
            &mut tx,
            NewResumeVersion {
                student_id,
                version,
                s3_key: &key,
                file_name: &accepted.file_name,
                content_type: &accepted.content_type,
                size_bytes,
            },
        )
        .await?;
        tx.commit().await?;
        Ok::<_, sqlx::Error>(row)
    };
    let row = persist_or_discard(
        persist,
        delete_resume(&state.s3, &state.config.s3_bucket, &key),
    )
    .await?;

    info!(
        "Stored resume v{version} for student {student_id} ({size_bytes} bytes)"
    );
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/v1/resumes/:id/review
pub async fn handle_review_resume(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
    Json(decision): Json<ReviewDecision>,
) -> Result<Json<ResumeVersionRow>, AppError> {
    let existing = get_version(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume version {id} not found")))?;
    viewer.authorize(existing.student_id, Access::StaffWrite)?;

    let (status, feedback) = validate_decision(decision)?;
    let row = record_decision(&state.db, id, status, feedback.as_deref(), viewer.id).await?;
    info!(
        "Resume v{} for student {} marked {:?}",
        row.version, row.student_id, row.status
    );
    Ok(Json(row))
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub url: String,
    pub expires_in_secs: u64,
}

/// GET /api/v1/resumes/:id/download
pub async fn handle_download_resume(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
) -> Result<Json<DownloadResponse>, AppError> {
    let existing = get_version(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume version {id} not found")))?;
    viewer.authorize(existing.student_id, Access::Read)?;

    let url = presigned_download_url(&state.s3, &state.config.s3_bucket, &existing.s3_key).await?;
    Ok(Json(DownloadResponse {
        url,
        expires_in_secs: DOWNLOAD_URL_TTL.as_secs(),
    }))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let existing = get_version(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume version {id} not found")))?;
    viewer.authorize(existing.student_id, Access::OwnerWrite)?;

    delete_then_remove(
        mark_deleted(&state.db, id),
        delete_resume(&state.s3, &state.config.s3_bucket, &existing.s3_key),
    )
    .await?;
    info!(
        "Deleted resume v{} for student {}",
        existing.version, existing.student_id
    );
    Ok(StatusCode::NO_CONTENT)
}
