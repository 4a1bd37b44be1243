mod activity;
mod config;
mod db;
mod errors;
mod goals;
mod interviews;
mod models;
mod notifications;
mod office_hours;
mod progress;
mod resumes;
mod reviews;
mod routes;
mod scoring;
mod selection;
mod state;
mod viewer;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::notifications::dispatcher::ReminderDispatcher;
use crate::notifications::transactional::TransactionalEmailClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast on missing required env vars
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CoachTrack API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let cancel = CancellationToken::new();
    let dispatcher_handle = match &config.email_api_key {
        Some(api_key) => {
            let sender = TransactionalEmailClient::new(
                config.email_api_url.clone(),
                api_key.clone(),
                config.email_from.clone(),
            )?;
            let dispatcher = ReminderDispatcher::new(
                db.clone(),
                Arc::new(sender),
                Duration::from_secs(config.reminder_poll_secs.max(1)),
                config.reminder_batch_size.max(1),
            );
            let token = cancel.clone();
            info!(
                "Reminder dispatcher started (every {}s)",
                config.reminder_poll_secs
            );
            Some(tokio::spawn(async move { dispatcher.run(token).await }))
        }
        None => {
            warn!("EMAIL_API_KEY not set; reminders will not be delivered");
            None
        }
    };

    let state = AppState {
        db,
        redis,
        s3,
        config: config.clone(),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()), // TODO: restrict origins once the dashboard host is fixed
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    cancel.cancel();
    if let Some(handle) = dispatcher_handle {
        if let Err(e) = handle.await {
            warn!("Reminder dispatcher ended abnormally: {e}");
        }
    }
    info!("Shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C and cancels background work.
async fn shutdown_signal(cancel: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Shutdown signal received");
    cancel.cancel();
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "coachtrack-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
