use anyhow::{anyhow, Context, Result};

use crate::timeline::{OverlapMode, DEFAULT_GAP_THRESHOLD_DAYS};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub firebase_api_key: String,
    pub allowed_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
    pub timeline_gap_threshold_days: i64,
    pub timeline_overlap_mode: OverlapMode,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            firebase_api_key: require_env("FIREBASE_API_KEY")?,
            allowed_origins: parse_origins(
                &std::env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            timeline_gap_threshold_days: match std::env::var("TIMELINE_GAP_THRESHOLD_DAYS") {
                Ok(v) => v
                    .parse::<i64>()
                    .context("TIMELINE_GAP_THRESHOLD_DAYS must be a whole number of days")?,
                Err(_) => DEFAULT_GAP_THRESHOLD_DAYS,
            },
            timeline_overlap_mode: match std::env::var("TIMELINE_OVERLAP_MODE") {
                Ok(v) => v.parse::<OverlapMode>().map_err(|e| anyhow!(e))?,
                Err(_) => OverlapMode::default(),
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
