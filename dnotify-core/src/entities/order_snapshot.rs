use serde::Deserialize;
use serde_json::{Map, Value};

/// One side of an order update event (document state before or after the
/// write).
///
/// Snapshots carry the full order document as written by the ordering
/// service. Only the `driverId` field is interpreted here; everything else
/// stays opaque.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct OrderSnapshot {
    fields: Map<String, Value>,
}

impl OrderSnapshot {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// The assigned driver, if any.
    ///
    /// A missing field, a null, a non-string value, and an empty string all
    /// count as "no driver assigned".
    pub fn driver_id(&self) -> Option<&str> {
        match self.fields.get("driverId").and_then(Value::as_str) {
            Some("") | None => None,
            Some(id) => Some(id),
        }
    }
}
