//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development. The email and SMS provider settings are
//! optional; a missing provider just makes that contact method unavailable.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Settings for the SendGrid email channel.
#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub api_key: String,
    pub from_address: String,
}

/// Settings for the Twilio SMS channel.
#[derive(Clone, Debug)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub allowed_origin: String,
    pub openai_api_key: Option<String>,
    pub content_model: String,
    pub tts_voice: String,
    pub audio_dir: PathBuf,
    pub email: Option<EmailConfig>,
    pub sms: Option<SmsConfig>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let allowed_origin =
            std::env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());

        // --- Load Generation Settings ---
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        let content_model =
            std::env::var("CONTENT_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        let tts_voice = std::env::var("TTS_VOICE").unwrap_or_else(|_| "alloy".to_string());
        let audio_dir = std::env::var("AUDIO_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./audio"));

        // --- Load Sharing Provider Settings (all optional) ---
        let email = std::env::var("SENDGRID_API_KEY").ok().map(|api_key| EmailConfig {
            api_key,
            from_address: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "no-reply@lingualisten.com".to_string()),
        });

        let sms = match (
            std::env::var("TWILIO_ACCOUNT_SID").ok(),
            std::env::var("TWILIO_AUTH_TOKEN").ok(),
            std::env::var("TWILIO_PHONE_NUMBER").ok(),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => Some(SmsConfig {
                account_sid,
                auth_token,
                from_number,
            }),
            _ => None,
        };

        Ok(Self {
            bind_address,
            log_level,
            allowed_origin,
            openai_api_key,
            content_model,
            tts_voice,
            audio_dir,
            email,
            sms,
        })
    }
}
