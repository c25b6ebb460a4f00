//! services/api/src/adapters/email.rs
//!
//! The SendGrid email adapter, implementing the `DeliveryChannel` port for
//! the `email` contact method. An unconfigured adapter reports itself
//! unavailable rather than failing at startup.

use crate::config::EmailConfig;
use async_trait::async_trait;
use lingualisten_core::domain::ContactMethod;
use lingualisten_core::ports::{DeliveryChannel, PortError, PortResult};
use lingualisten_core::report::{email_subject, render_email_html, ResultsReport};
use serde_json::json;
use tracing::info;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

pub struct SendGridEmailAdapter {
    http: reqwest::Client,
    config: Option<EmailConfig>,
}

impl SendGridEmailAdapter {
    pub fn new(http: reqwest::Client, config: Option<EmailConfig>) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl DeliveryChannel for SendGridEmailAdapter {
    fn method(&self) -> ContactMethod {
        ContactMethod::Email
    }

    fn is_available(&self) -> bool {
        self.config.is_some()
    }

    async fn deliver(&self, report: &ResultsReport, contact_info: &str) -> PortResult<()> {
        let config = self.config.as_ref().ok_or_else(|| {
            PortError::Validation("The email channel is not configured".to_string())
        })?;

        let payload = json!({
            "personalizations": [{ "to": [{ "email": contact_info }] }],
            "from": { "email": config.from_address, "name": "LinguaListen" },
            "subject": email_subject(report),
            "content": [{ "type": "text/html", "value": render_email_html(report) }],
        });

        let response = self
            .http
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PortError::External(format!("Email provider request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PortError::External(format!(
                "Email provider returned {}: {}",
                status, body
            )));
        }

        info!("Assessment report emailed to {}", contact_info);
        Ok(())
    }
}
