//! Push notification delivery.
//!
//! A [`PushTransport`] delivers one payload to one registered device token.
//! No retry, no batching, no multi-device fan-out.

pub mod fcm;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use fcm::FcmClient;

/// A notification as handed to the delivery transport.
///
/// Payloads are fixed-shape: a title and a body, nothing derived from the
/// order contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
}

impl NotificationPayload {
    /// The payload sent for every new driver assignment.
    pub fn new_assignment() -> Self {
        Self {
            title: "🛵 New Delivery Assigned".to_string(),
            body: "You have a new order to deliver!".to_string(),
        }
    }
}

/// Errors that can occur during push delivery.
#[derive(Debug, Error)]
pub enum PushError {
    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The push service rejected the message (bad token, auth, quota)
    #[error("push delivery failed with status {status}: {body}")]
    DeliveryFailed { status: u16, body: String },
}

/// Transport that delivers a payload to a single device token.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn send(&self, token: &str, payload: &NotificationPayload) -> Result<(), PushError>;
}
