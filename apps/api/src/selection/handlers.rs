use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::month::Month;
use crate::models::profile::{ProfileRole, ProfileRow};
use crate::selection::generation::{load_selection, store_selection, Selection};
use crate::selection::suggest::{
    clamp_limit, rank, suggest_values, ValueSuggestions, INDUSTRY_CATALOG, ROLE_CATALOG,
};
use crate::state::AppState;
use crate::viewer::{Access, Viewer};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct StudentOption {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

/// GET /api/v1/students
///
/// Staff-only student picker. Matches on name, falling back to email.
pub async fn handle_search_students(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<StudentOption>>, AppError> {
    viewer.require_staff()?;

    let students = sqlx::query_as::<_, ProfileRow>(
        "SELECT * FROM profiles WHERE role = $1 ORDER BY full_name",
    )
    .bind(ProfileRole::Student)
    .fetch_all(&state.db)
    .await?;

    let limit = clamp_limit(params.limit);
    let mut ranked = rank(&students, &params.q, limit, |p| p.full_name.as_str());
    if ranked.is_empty() {
        ranked = rank(&students, &params.q, limit, |p| p.email.as_str());
    }

    Ok(Json(
        ranked
            .into_iter()
            .map(|p| StudentOption {
                id: p.id,
                full_name: p.full_name.clone(),
                email: p.email.clone(),
            })
            .collect(),
    ))
}

/// GET /api/v1/suggestions/:kind
///
/// `kind` is `roles` or `industries`. Draws on the built-in catalog plus every
/// value already saved on a career goal.
pub async fn handle_suggest_targets(
    State(state): State<AppState>,
    _viewer: Viewer,
    Path(kind): Path<String>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ValueSuggestions>, AppError> {
    let (catalog, column) = match kind.as_str() {
        "roles" => (ROLE_CATALOG, "target_roles"),
        "industries" => (INDUSTRY_CATALOG, "target_industries"),
        other => {
            return Err(AppError::NotFound(format!(
                "Unknown suggestion list '{other}'"
            )))
        }
    };

    let used: Vec<String> = sqlx::query_scalar(&format!(
        "SELECT DISTINCT unnest({column}) FROM career_goals"
    ))
    .fetch_all(&state.db)
    .await?;

    let mut values: Vec<String> = catalog.iter().map(|s| s.to_string()).collect();
    values.extend(used);

    Ok(Json(suggest_values(
        &values,
        &params.q,
        clamp_limit(params.limit),
    )))
}

/// GET /api/v1/selection
pub async fn handle_get_selection(
    State(state): State<AppState>,
    viewer: Viewer,
) -> Result<Json<Option<Selection>>, AppError> {
    Ok(Json(load_selection(&state.redis, viewer.id).await?))
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    /// Students may omit this; it defaults to themselves.
    pub student_id: Option<Uuid>,
    pub month: Option<Month>,
}

/// PUT /api/v1/selection
///
/// Switches the viewer's active student/month and returns the new generation.
pub async fn handle_put_selection(
    State(state): State<AppState>,
    viewer: Viewer,
    Json(req): Json<SelectionRequest>,
) -> Result<Json<Selection>, AppError> {
    let student_id = req.student_id.unwrap_or(viewer.id);
    viewer.authorize(student_id, Access::Read)?;

    let exists: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM profiles WHERE id = $1 AND role = $2")
            .bind(student_id)
            .bind(ProfileRole::Student)
            .fetch_optional(&state.db)
            .await?;
    if exists.is_none() {
        return Err(AppError::NotFound(format!("Student {student_id} not found")));
    }

    let month = match req.month {
        Some(m) => m,
        None => current_month()?,
    };

    let selection = store_selection(&state.redis, viewer.id, student_id, month).await?;
    info!(
        "Viewer {} selected student {} for {} (generation {})",
        viewer.id, student_id, month, selection.generation
    );
    Ok(Json(selection))
}

pub fn current_month() -> Result<Month, AppError> {
    Month::containing(Utc::now().date_naive())
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("system clock outside supported range")))
}
