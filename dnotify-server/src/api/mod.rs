//! Event ingestion API handlers.
//!
//! The event source delivers one request per write to an order document,
//! carrying both sides of the write.
//!
//! # Endpoints
//!
//! - `POST /events/orders/{order_id}` – order update event (before/after snapshots)

use axum::{Router, http::StatusCode, response::IntoResponse, routing::post};
use dnotify_core::processors::WatchError;

use crate::state::AppState;

mod order_events;

/// Build the event API router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/events/orders/{order_id}",
        post(order_events::order_updated),
    )
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors that can occur in event API handlers.
#[derive(Debug)]
enum EventApiError {
    /// Handling the update failed (profile lookup or push delivery).
    Watch(WatchError),
}

impl From<WatchError> for EventApiError {
    fn from(e: WatchError) -> Self {
        EventApiError::Watch(e)
    }
}

impl IntoResponse for EventApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            EventApiError::Watch(e) => {
                tracing::error!(error = %e, "failed to handle order update event");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
