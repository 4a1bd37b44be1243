use std::str::FromStr;

use anyhow::{Context, Result};

const DEFAULT_MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com/emails";
const DEFAULT_EMAIL_FROM: &str = "noreply@coachtrack.local";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound for a single resume upload, in bytes.
    pub max_resume_bytes: usize,
    pub email_api_url: String,
    /// Reminder delivery is disabled when no key is configured.
    pub email_api_key: Option<String>,
    pub email_from: String,
    pub reminder_poll_secs: u64,
    pub reminder_batch_size: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_resume_bytes: parse_env("MAX_RESUME_BYTES", DEFAULT_MAX_RESUME_BYTES)?,
            email_api_url: std::env::var("EMAIL_API_URL")
                .unwrap_or_else(|_| DEFAULT_EMAIL_API_URL.to_string()),
            email_api_key: std::env::var("EMAIL_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| DEFAULT_EMAIL_FROM.to_string()),
            reminder_poll_secs: parse_env("REMINDER_POLL_SECS", 60)?,
            reminder_batch_size: parse_env("REMINDER_BATCH_SIZE", 50)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default() {
        std::env::remove_var("COACHTRACK_TEST_UNSET");
        let value: u16 = parse_env("COACHTRACK_TEST_UNSET", 8080).unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("COACHTRACK_TEST_GARBAGE", "eighty");
        let result: Result<u16> = parse_env("COACHTRACK_TEST_GARBAGE", 8080);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_env_trims_whitespace() {
        std::env::set_var("COACHTRACK_TEST_PADDED", " 42 ");
        let value: u64 = parse_env("COACHTRACK_TEST_PADDED", 1).unwrap();
        assert_eq!(value, 42);
    }
}
