use std::env;
use std::time::Duration;

use anyhow::Context;

use crate::adapters::XCredentials;
use crate::app::{announcement_publisher, notification_dispatcher};
use crate::domain::ports::DEFAULT_MAX_POST_LEN;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Base URL used to build article links in notifications and posts
    pub public_base_url: String,
    pub mail_api_url: Option<String>,
    pub mail_api_key: Option<String>,
    pub mail_from: String,
    pub x_api_url: String,
    pub x_api_key: Option<String>,
    pub x_access_token: Option<String>,
    pub x_bearer_token: Option<String>,
    pub announcement_max_len: usize,
    pub announcement_timeout: Duration,
    pub notify_concurrency: usize,
    pub send_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let number = |key: &str, default: u64| {
            var(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        Ok(Self {
            database_url: var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: var("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(8080),
            public_base_url: var("PUBLIC_BASE_URL")
                .unwrap_or_else(|| "http://localhost:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            mail_api_url: var("MAIL_API_URL"),
            mail_api_key: var("MAIL_API_KEY"),
            mail_from: var("MAIL_FROM").unwrap_or_else(|| "noreply@newsroom.local".to_string()),
            x_api_url: var("X_API_URL").unwrap_or_else(|| "https://api.twitter.com".to_string()),
            x_api_key: var("X_API_KEY"),
            x_access_token: var("X_ACCESS_TOKEN"),
            x_bearer_token: var("X_BEARER_TOKEN"),
            announcement_max_len: number("ANNOUNCEMENT_MAX_LEN", DEFAULT_MAX_POST_LEN as u64)
                .max(1) as usize,
            announcement_timeout: Duration::from_secs(number(
                "ANNOUNCEMENT_TIMEOUT_SECS",
                announcement_publisher::DEFAULT_ANNOUNCE_TIMEOUT.as_secs(),
            )),
            notify_concurrency: number(
                "NOTIFY_CONCURRENCY",
                notification_dispatcher::DEFAULT_CONCURRENCY as u64,
            )
            .max(1) as usize,
            send_timeout: Duration::from_secs(number(
                "SEND_TIMEOUT_SECS",
                notification_dispatcher::DEFAULT_SEND_TIMEOUT.as_secs(),
            )),
        })
    }

    /// Mail API endpoint and key, when both are configured
    pub fn mail_api(&self) -> Option<(&str, &str)> {
        match (&self.mail_api_url, &self.mail_api_key) {
            (Some(url), Some(key)) => Some((url.as_str(), key.as_str())),
            _ => None,
        }
    }

    pub fn x_credentials(&self) -> XCredentials {
        XCredentials {
            api_key: self.x_api_key.clone(),
            access_token: self.x_access_token.clone(),
            bearer_token: self.x_bearer_token.clone(),
        }
    }
}
