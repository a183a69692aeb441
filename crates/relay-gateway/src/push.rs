//! Push delivery over HTTP
//!
//! Implements the `PushNotifier` port against an FCM-style legacy HTTP
//! endpoint. Delivery is best-effort by contract: callers log and swallow
//! failures, so this client only needs to report them accurately.

use async_trait::async_trait;
use relay_common::PushConfig;
use relay_core::{PushError, PushNotifier, PushPayload};
use reqwest::header::AUTHORIZATION;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// HTTP push client
pub struct HttpPushNotifier {
    client: reqwest::Client,
    endpoint: String,
    server_key: String,
}

impl HttpPushNotifier {
    /// Build a client from configuration
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed
    pub fn new(config: &PushConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            server_key: config.server_key.clone(),
        })
    }
}

#[async_trait]
impl PushNotifier for HttpPushNotifier {
    async fn dispatch(&self, payload: &PushPayload) -> Result<(), PushError> {
        let body = json!({
            "registration_ids": payload.tokens,
            "notification": {
                "title": payload.title,
                "body": payload.body,
                "icon": payload.icon_url,
                "click_action": payload.deep_link_url,
            },
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("key={}", self.server_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| PushError(e.to_string()))?;

        response
            .error_for_status()
            .map_err(|e| PushError(e.to_string()))?;

        debug!(recipients = payload.tokens.len(), "Push dispatched");
        Ok(())
    }
}

/// No-op notifier used when push delivery is not configured
pub struct DisabledPushNotifier;

#[async_trait]
impl PushNotifier for DisabledPushNotifier {
    async fn dispatch(&self, payload: &PushPayload) -> Result<(), PushError> {
        debug!(
            recipients = payload.tokens.len(),
            "Push disabled, payload dropped"
        );
        Ok(())
    }
}
