use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Viewer selection state and generation counters.
    pub redis: RedisClient,
    /// Resume file storage.
    pub s3: S3Client,
    pub config: Config,
}
