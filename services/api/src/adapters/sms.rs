//! services/api/src/adapters/sms.rs
//!
//! The Twilio SMS adapter, implementing the `DeliveryChannel` port for the
//! `sms` contact method. Availability follows the presence of the Twilio
//! credentials in the configuration.

use crate::config::SmsConfig;
use async_trait::async_trait;
use lingualisten_core::domain::ContactMethod;
use lingualisten_core::ports::{DeliveryChannel, PortError, PortResult};
use lingualisten_core::report::{render_sms_text, ResultsReport};
use tracing::info;

pub struct TwilioSmsAdapter {
    http: reqwest::Client,
    config: Option<SmsConfig>,
}

impl TwilioSmsAdapter {
    pub fn new(http: reqwest::Client, config: Option<SmsConfig>) -> Self {
        Self { http, config }
    }

    fn messages_url(account_sid: &str) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            account_sid
        )
    }
}

#[async_trait]
impl DeliveryChannel for TwilioSmsAdapter {
    fn method(&self) -> ContactMethod {
        ContactMethod::Sms
    }

    fn is_available(&self) -> bool {
        self.config.is_some()
    }

    async fn deliver(&self, report: &ResultsReport, contact_info: &str) -> PortResult<()> {
        let config = self.config.as_ref().ok_or_else(|| {
            PortError::Validation("The SMS channel is not configured".to_string())
        })?;

        let body = render_sms_text(report);
        let params = [
            ("To", contact_info),
            ("From", config.from_number.as_str()),
            ("Body", body.as_str()),
        ];

        let response = self
            .http
            .post(Self::messages_url(&config.account_sid))
            .basic_auth(&config.account_sid, Some(&config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| PortError::External(format!("SMS provider request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PortError::External(format!(
                "SMS provider returned {}: {}",
                status, body
            )));
        }

        info!("Assessment report texted to {}", contact_info);
        Ok(())
    }
}
