//! Per-viewer selection state kept in Redis.
//!
//! Every selection change bumps the viewer's generation counter. Panel
//! requests echo the generation they were issued under, and a response is
//! refused once a newer selection exists, so a slow fetch for a previous
//! student or month can never overwrite the current view.

use std::collections::HashMap;

use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::month::Month;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Selection {
    pub student_id: Uuid,
    pub month: Month,
    pub generation: u64,
}

fn selection_key(viewer_id: Uuid) -> String {
    format!("selection:{viewer_id}:current")
}

fn generation_key(viewer_id: Uuid) -> String {
    format!("selection:{viewer_id}:generation")
}

/// Bumps the generation and writes the selection hash in one step, so the
/// stored selection always carries the counter value it was issued with.
///
/// KEYS[1] = generation counter, KEYS[2] = selection hash
/// ARGV[1] = student id, ARGV[2] = month
const STORE_SELECTION_SCRIPT: &str = r#"
local generation = redis.call('INCR', KEYS[1])
redis.call('HSET', KEYS[2], 'student_id', ARGV[1], 'month', ARGV[2], 'generation', generation)
return generation
"#;

/// Passes when no generation was supplied or it is still the current one.
pub fn check_generation(requested: Option<u64>, current: u64) -> Result<(), AppError> {
    match requested {
        Some(requested) if requested != current => {
            Err(AppError::StaleSelection { requested, current })
        }
        _ => Ok(()),
    }
}

/// Rebuilds a selection from its Redis hash. An empty hash means none is stored.
fn selection_from_fields(fields: &HashMap<String, String>) -> Result<Option<Selection>, AppError> {
    if fields.is_empty() {
        return Ok(None);
    }
    let corrupt = |what: &str| AppError::Internal(anyhow::anyhow!("corrupt selection state: {what}"));
    let field = |name: &str| fields.get(name).ok_or_else(|| corrupt(name));

    Ok(Some(Selection {
        student_id: Uuid::parse_str(field("student_id")?).map_err(|_| corrupt("student_id"))?,
        month: field("month")?.parse().map_err(|_| corrupt("month"))?,
        generation: field("generation")?.parse().map_err(|_| corrupt("generation"))?,
    }))
}

pub async fn load_selection(
    redis: &redis::Client,
    viewer_id: Uuid,
) -> Result<Option<Selection>, AppError> {
    let mut con = redis.get_multiplexed_async_connection().await?;
    let fields: HashMap<String, String> = con.hgetall(selection_key(viewer_id)).await?;
    selection_from_fields(&fields)
}

pub async fn store_selection(
    redis: &redis::Client,
    viewer_id: Uuid,
    student_id: Uuid,
    month: Month,
) -> Result<Selection, AppError> {
    let mut con = redis.get_multiplexed_async_connection().await?;
    let generation: u64 = redis::Script::new(STORE_SELECTION_SCRIPT)
        .key(generation_key(viewer_id))
        .key(selection_key(viewer_id))
        .arg(student_id.to_string())
        .arg(month.to_string())
        .invoke_async(&mut con)
        .await?;

    debug!(%viewer_id, %student_id, %month, generation, "Selection updated");
    Ok(Selection {
        student_id,
        month,
        generation,
    })
}

pub async fn current_generation(redis: &redis::Client, viewer_id: Uuid) -> Result<u64, AppError> {
    let mut con = redis.get_multiplexed_async_connection().await?;
    let generation: Option<u64> = con.get(generation_key(viewer_id)).await?;
    Ok(generation.unwrap_or(0))
}

/// Called by panels after their fetch completes and before responding.
pub async fn ensure_current(
    redis: &redis::Client,
    viewer_id: Uuid,
    requested: Option<u64>,
) -> Result<(), AppError> {
    if requested.is_none() {
        return Ok(());
    }
    let current = current_generation(redis, viewer_id).await?;
    check_generation(requested, current)
}
