//! FCM HTTP transport.
//!
//! Delivers notification payloads through the Firebase Cloud Messaging
//! legacy HTTP endpoint, one request per device token. The endpoint is
//! configurable so tests and local emulators can point it elsewhere.

use super::{NotificationPayload, PushError, PushTransport};
use async_trait::async_trait;
use serde::Serialize;
use url::Url;

/// FCM client holding the server key credential.
pub struct FcmClient {
    endpoint: Url,
    server_key: String,
    http_client: reqwest::Client,
}

/// Wire shape of a single-device legacy FCM send.
#[derive(Debug, Serialize)]
struct FcmMessage<'a> {
    to: &'a str,
    notification: &'a NotificationPayload,
}

impl FcmClient {
    /// Create a new FcmClient.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - FCM send endpoint URL
    /// * `server_key` - Server key sent with every request
    pub fn new(endpoint: Url, server_key: String) -> Self {
        Self {
            endpoint,
            server_key,
            http_client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

#[async_trait]
impl PushTransport for FcmClient {
    async fn send(&self, token: &str, payload: &NotificationPayload) -> Result<(), PushError> {
        let message = FcmMessage {
            to: token,
            notification: payload,
        };

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header("Authorization", format!("key={}", self.server_key))
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(PushError::DeliveryFailed {
                status: status.as_u16(),
                body,
            })
        }
    }
}
