use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub auth_base_url: String,
    pub auth_anon_key: String,
    pub auth_redirect_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            auth_base_url: env::var("AUTH_BASE_URL").context("AUTH_BASE_URL must be set")?,
            auth_anon_key: env::var("AUTH_ANON_KEY").context("AUTH_ANON_KEY must be set")?,
            auth_redirect_url: env::var("AUTH_REDIRECT_URL").ok(),
        })
    }
}
