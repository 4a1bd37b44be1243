use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Liveness: answers without touching any backing service.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "coachtrack-api"
    }))
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub database: bool,
    pub redis: bool,
}

fn readiness(database: bool, redis: bool) -> (StatusCode, ReadinessResponse) {
    let ready = database && redis;
    (
        if ready {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        },
        ReadinessResponse {
            status: if ready { "ok" } else { "degraded" },
            database,
            redis,
        },
    )
}

/// GET /health/ready
/// 503 unless both Postgres and Redis answer.
pub async fn readiness_handler(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let database = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();
    let redis = match state.redis.get_multiplexed_async_connection().await {
        Ok(mut con) => redis::cmd("PING")
            .query_async::<_, String>(&mut con)
            .await
            .is_ok(),
        Err(_) => false,
    };
    if !(database && redis) {
        tracing::warn!(database, redis, "Readiness check failed");
    }
    let (status, body) = readiness(database, redis);
    (status, Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_only_when_everything_answers() {
        assert_eq!(readiness(true, true).0, StatusCode::OK);
        assert_eq!(readiness(false, true).0, StatusCode::SERVICE_UNAVAILABLE);
        let (_, body) = readiness(true, false);
        assert_eq!(body.status, "degraded");
        assert!(!body.redis);
    }
}
