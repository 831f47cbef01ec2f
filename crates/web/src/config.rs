use std::path::PathBuf;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
    pub verification_code_ttl_seconds: i64,
    pub media_root: PathBuf,
    pub media_url: String,
    pub sms_gateway_url: Option<String>,
    pub sms_gateway_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            jwt_secret: std::env::var("JWT_SECRET")
                .context("Cannot load JWT_SECRET env variable")?,
            access_token_ttl_minutes: parse_or("ACCESS_TOKEN_TTL_MINUTES", 5)?,
            refresh_token_ttl_days: parse_or("REFRESH_TOKEN_TTL_DAYS", 1)?,
            verification_code_ttl_seconds: parse_or("VERIFICATION_CODE_TTL_SECONDS", 300)?,
            media_root: std::env::var("MEDIA_ROOT")
                .unwrap_or_else(|_| "./media".to_string())
                .into(),
            media_url: std::env::var("MEDIA_URL").unwrap_or_else(|_| "/media".to_string()),
            sms_gateway_url: std::env::var("SMS_GATEWAY_URL").ok(),
            sms_gateway_token: std::env::var("SMS_GATEWAY_TOKEN").ok(),
        })
    }
}

fn parse_or(name: &str, default: i64) -> Result<i64> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{} must be a number", name)),
        Err(_) => Ok(default),
    }
}
