use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::activity::store::{list_applications, list_interactions};
use crate::errors::AppError;
use crate::goals::store::get_goal;
use crate::interviews::store::list_interviews;
use crate::office_hours::store::list_records;
use crate::progress::overview::{build_overview, OverviewInputs, PerformanceOverview};
use crate::reviews::store::get_review;
use crate::selection::generation::ensure_current;
use crate::selection::handlers::current_month;
use crate::selection::PanelQuery;
use crate::state::AppState;
use crate::viewer::{Access, Viewer};

/// GET /api/v1/students/:student_id/progress
///
/// Month defaults to the current calendar month.
pub async fn handle_get_progress(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(student_id): Path<Uuid>,
    Query(params): Query<PanelQuery>,
) -> Result<Json<PerformanceOverview>, AppError> {
    viewer.authorize(student_id, Access::Read)?;
    let month = match params.month {
        Some(month) => month,
        None => current_month()?,
    };

    let (goal, applications, networking, interviews, office_hours, review, previous_review) = tokio::try_join!(
        get_goal(&state.db, student_id),
        list_applications(&state.db, student_id, Some(month)),
        list_interactions(&state.db, student_id, Some(month)),
        list_interviews(&state.db, student_id, Some(month)),
        list_records(&state.db, student_id, Some(month)),
        get_review(&state.db, student_id, month),
        get_review(&state.db, student_id, month.previous()),
    )?;

    let overview = build_overview(
        month,
        &OverviewInputs {
            goal,
            applications,
            networking,
            interviews,
            office_hours,
            review,
            previous_review,
        },
    );

    ensure_current(&state.redis, viewer.id, params.generation).await?;
    Ok(Json(overview))
}
