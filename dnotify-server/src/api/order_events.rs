use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use dnotify_core::entities::order_snapshot::OrderSnapshot;
use dnotify_core::processors::DispatchOutcome;
use serde::{Deserialize, Serialize};

use super::EventApiError;
use crate::state::AppState;

/// An update event for a single order document.
#[derive(Debug, Deserialize)]
pub struct OrderUpdateEvent {
    /// Document state prior to the write.
    pub before: OrderSnapshot,
    /// Document state following the write.
    pub after: OrderSnapshot,
}

/// Response body for a handled event.
#[derive(Debug, Serialize)]
struct EventResponse {
    notified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    driver_id: Option<String>,
}

/// `POST /events/orders/{order_id}` – handle one order update event.
///
/// Expected no-ops (no assignment transition, unknown driver, missing
/// token) return 200 so the event source does not redeliver. Store and
/// delivery failures surface as 500; redelivery of the same event is safe,
/// at the cost of a possible duplicate push.
pub(super) async fn order_updated(
    state: State<AppState>,
    Path(order_id): Path<String>,
    Json(event): Json<OrderUpdateEvent>,
) -> Result<impl IntoResponse, EventApiError> {
    let outcome = state
        .watcher
        .handle_update(&order_id, &event.before, &event.after)
        .await?;

    let response = match outcome {
        DispatchOutcome::Notified { driver_id } => EventResponse {
            notified: true,
            driver_id: Some(driver_id),
        },
        DispatchOutcome::Skipped(_) => EventResponse {
            notified: false,
            driver_id: None,
        },
    };

    Ok(Json(response))
}
