//! Notification delivery
//!
//! The pipeline only depends on `NotificationSink`; the webhook notifier is
//! the production implementation.

use async_trait::async_trait;
use std::time::Duration;

use super::embed::WebhookPayload;
use crate::error::NotifyError;

/// Destination for a cycle digest
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one payload
    ///
    /// `Ok(())` means the receiver accepted it (2xx).
    async fn deliver(&self, payload: &WebhookPayload) -> Result<(), NotifyError>;
}

/// Posts digests to a chat webhook
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: Option<String>,
}

impl WebhookNotifier {
    pub fn new(url: Option<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.filter(|u| !u.trim().is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }
}

#[async_trait]
impl NotificationSink for WebhookNotifier {
    async fn deliver(&self, payload: &WebhookPayload) -> Result<(), NotifyError> {
        let url = self.url.as_deref().ok_or(NotifyError::NotConfigured)?;

        let response = self.client.post(url).json(payload).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }

        log::info!("📨 Webhook delivered ({})", status.as_u16());
        Ok(())
    }
}
