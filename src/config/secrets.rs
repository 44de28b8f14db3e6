// src/config/secrets.rs
//! Notifier credentials, read from the process environment.
//!
//! Blank values count as missing. Secrets never show up in `Debug` output.

use std::fmt;

use thiserror::Error;

use super::consts::{
    DEFAULT_SMTP_HOST, ENV_CHAT_ID, ENV_EMAIL_PASSWORD, ENV_EMAIL_TO, ENV_EMAIL_USER, ENV_SMTP_HOST,
    ENV_TELEGRAM_TOKEN,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("unknown job {0:?}")]
    UnknownJob(String),
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::Missing(key))
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[derive(Clone, PartialEq, Eq)]
pub struct TelegramCredentials {
    pub token: String,
    pub chat_id: String,
}

impl TelegramCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            token: required(&lookup, ENV_TELEGRAM_TOKEN)?,
            chat_id: required(&lookup, ENV_CHAT_ID)?,
        })
    }
}

impl fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct EmailCredentials {
    pub user: String,
    pub password: String,
    /// Recipient; the sender's own address unless `EMAIL_TO` is set.
    pub to: String,
    pub smtp_host: String,
}

impl EmailCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let user = required(&lookup, ENV_EMAIL_USER)?;
        let password = required(&lookup, ENV_EMAIL_PASSWORD)?;
        let to = optional(&lookup, ENV_EMAIL_TO).unwrap_or_else(|| user.clone());
        let smtp_host = optional(&lookup, ENV_SMTP_HOST).unwrap_or_else(|| s!(DEFAULT_SMTP_HOST));
        Ok(Self { user, password, to, smtp_host })
    }
}

impl fmt::Debug for EmailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailCredentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("to", &self.to)
            .field("smtp_host", &self.smtp_host)
            .finish()
    }
}
