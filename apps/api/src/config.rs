use anyhow::{Context, Result};

use crate::llm_client::OPENROUTER_API_URL;

/// Origins the web client is served from.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "https://career-path-d5fd0.web.app",
    "https://career-path-d5fd0.firebaseapp.com",
];

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: String,
    pub openrouter_api_url: String,
    pub cors_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openrouter_api_key: require_env("OPENROUTER_API_KEY")?,
            openrouter_api_url: std::env::var("OPENROUTER_API_URL")
                .unwrap_or_else(|_| OPENROUTER_API_URL.to_string()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_else(|_| default_origins()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn default_origins() -> Vec<String> {
    DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect()
}

/// Splits a comma-separated origin list, dropping blanks.
/// Falls back to the defaults when nothing usable is left.
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        default_origins()
    } else {
        origins
    }
}
