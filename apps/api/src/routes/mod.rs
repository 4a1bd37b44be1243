pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::state::AppState;
use crate::{
    activity, goals, interviews, notifications, office_hours, progress, resumes, reviews,
    selection,
};

pub fn build_router(state: AppState) -> Router {
    // Oversized files still reach upload validation and get its message.
    let upload_limit = state.config.max_resume_bytes.saturating_mul(2);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/health/ready", get(health::readiness_handler))
        // Selection & suggestions
        .route(
            "/api/v1/students",
            get(selection::handlers::handle_search_students),
        )
        .route(
            "/api/v1/suggestions/:kind",
            get(selection::handlers::handle_suggest_targets),
        )
        .route(
            "/api/v1/selection",
            get(selection::handlers::handle_get_selection)
                .put(selection::handlers::handle_put_selection),
        )
        // Career goals
        .route(
            "/api/v1/students/:student_id/goals",
            get(goals::handlers::handle_get_goal).put(goals::handlers::handle_put_goal),
        )
        .route(
            "/api/v1/students/:student_id/goals/targets",
            patch(goals::handlers::handle_edit_targets),
        )
        // Performance reviews
        .route(
            "/api/v1/students/:student_id/reviews",
            get(reviews::handlers::handle_list_reviews),
        )
        .route(
            "/api/v1/students/:student_id/reviews/:month",
            get(reviews::handlers::handle_get_review)
                .put(reviews::handlers::handle_put_review)
                .delete(reviews::handlers::handle_delete_review),
        )
        .route(
            "/api/v1/students/:student_id/reviews/:month/seed",
            get(reviews::handlers::handle_review_seed),
        )
        // Mock interviews
        .route(
            "/api/v1/students/:student_id/interviews",
            get(interviews::handlers::handle_list_interviews)
                .post(interviews::handlers::handle_create_interview),
        )
        .route(
            "/api/v1/interviews/:id",
            put(interviews::handlers::handle_update_interview)
                .delete(interviews::handlers::handle_delete_interview),
        )
        // Office hours
        .route(
            "/api/v1/students/:student_id/office-hours",
            get(office_hours::handlers::handle_list_office_hours)
                .post(office_hours::handlers::handle_create_office_hours),
        )
        .route(
            "/api/v1/office-hours/:id",
            put(office_hours::handlers::handle_update_office_hours)
                .delete(office_hours::handlers::handle_delete_office_hours),
        )
        // Resumes
        .route(
            "/api/v1/students/:student_id/resumes",
            get(resumes::handlers::handle_list_resumes)
                .post(resumes::handlers::handle_upload_resume)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/v1/resumes/:id/review",
            patch(resumes::handlers::handle_review_resume),
        )
        .route(
            "/api/v1/resumes/:id/download",
            get(resumes::handlers::handle_download_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            delete(resumes::handlers::handle_delete_resume),
        )
        // Applications & networking
        .route(
            "/api/v1/students/:student_id/applications",
            get(activity::handlers::handle_list_applications)
                .post(activity::handlers::handle_create_application),
        )
        .route(
            "/api/v1/applications/:id",
            put(activity::handlers::handle_update_application)
                .delete(activity::handlers::handle_delete_application),
        )
        .route(
            "/api/v1/students/:student_id/networking",
            get(activity::handlers::handle_list_networking)
                .post(activity::handlers::handle_create_networking),
        )
        .route(
            "/api/v1/networking/:id",
            put(activity::handlers::handle_update_networking)
                .delete(activity::handlers::handle_delete_networking),
        )
        // Performance overview
        .route(
            "/api/v1/students/:student_id/progress",
            get(progress::handlers::handle_get_progress),
        )
        // Notifications
        .route(
            "/api/v1/reminders",
            post(notifications::handlers::handle_create_reminder),
        )
        .route(
            "/api/v1/students/:student_id/reminders",
            get(notifications::handlers::handle_list_reminders),
        )
        .route(
            "/api/v1/notifications/email",
            post(notifications::handlers::handle_send_email),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/coachtrack_test".to_string(),
            redis_url: "redis://127.0.0.1/".to_string(),
            s3_bucket: "resumes".to_string(),
            s3_endpoint: "http://127.0.0.1:9000".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            max_resume_bytes: 10 * 1024 * 1024,
            email_api_url: "http://127.0.0.1:1/emails".to_string(),
            email_api_key: None,
            email_from: "noreply@coachtrack.local".to_string(),
            reminder_poll_secs: 60,
            reminder_batch_size: 50,
        }
    }

    /// State whose backing services are never contacted by these tests.
    fn test_state() -> AppState {
        let config = test_config();
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new("us-east-1"))
            .build();
        AppState {
            db: PgPoolOptions::new()
                .connect_lazy(&config.database_url)
                .unwrap(),
            redis: redis::Client::open(config.redis_url.as_str()).unwrap(),
            s3: aws_sdk_s3::Client::from_conf(s3_config),
            config,
        }
    }

    #[tokio::test]
    async fn test_health_ok() {
        let response = build_router(test_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_viewer_header_is_unauthorized() {
        let response = build_router(test_state())
            .oneshot(
                Request::get("/api/v1/selection")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_viewer_header_is_unauthorized() {
        let response = build_router(test_state())
            .oneshot(
                Request::get("/api/v1/students/not-a-uuid/goals")
                    .header("x-viewer-id", "nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = build_router(test_state())
            .oneshot(Request::get("/api/v1/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
