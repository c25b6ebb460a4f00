//! crates/lingualisten_core/src/sharing.rs
//!
//! Routes a completed assessment's report to an email or SMS channel.
//! Boundary glue over the `DeliveryChannel` port; never mutates the
//! assessment and never retries a failed delivery.

use crate::domain::ContactMethod;
use crate::ports::{DeliveryChannel, PortError, PortResult};
use crate::report::ResultsReport;
use std::sync::Arc;

pub struct ShareDispatcher {
    channels: Vec<Arc<dyn DeliveryChannel>>,
}

impl ShareDispatcher {
    pub fn new(channels: Vec<Arc<dyn DeliveryChannel>>) -> Self {
        Self { channels }
    }

    fn channel_for(&self, method: ContactMethod) -> Option<&Arc<dyn DeliveryChannel>> {
        self.channels.iter().find(|c| c.method() == method)
    }

    /// Whether the given method is registered and currently available.
    /// Used to adjust UI options only, never to gate scoring.
    pub fn is_available(&self, method: ContactMethod) -> bool {
        self.channel_for(method)
            .map(|c| c.is_available())
            .unwrap_or(false)
    }

    /// Dispatches one report over the requested channel.
    ///
    /// Requires non-empty contact info and an available channel. A provider
    /// failure comes back as-is, with no retry.
    pub async fn share(
        &self,
        report: &ResultsReport,
        method: ContactMethod,
        contact_info: &str,
    ) -> PortResult<()> {
        if contact_info.trim().is_empty() {
            return Err(PortError::Validation(
                "Contact info must not be empty".to_string(),
            ));
        }

        let channel = self
            .channel_for(method)
            .filter(|c| c.is_available())
            .ok_or_else(|| {
                PortError::Validation(format!(
                    "Contact method '{}' is not currently available",
                    method
                ))
            })?;

        channel.deliver(report, contact_info.trim()).await
    }
}
