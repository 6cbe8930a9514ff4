//! AssignmentWatcher processor.
//!
//! The AssignmentWatcher is responsible for:
//! - Receiving order update events as (before, after) snapshot pairs
//! - Detecting the unassigned -> assigned driver transition
//! - Resolving the assigned driver's device token
//! - Dispatching a single push notification for a genuine new assignment
//!
//! The watcher holds no state of its own; the decision is pure in the two
//! snapshots, so handling the same pair twice reaches the same verdict
//! (delivery is at-least-once, a replay may send a duplicate push).

use crate::entities::order_snapshot::OrderSnapshot;
use crate::push::{NotificationPayload, PushError, PushTransport};
use crate::store::{ProfileStore, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while handling an order update.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Profile lookup failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Push delivery failed
    #[error(transparent)]
    Push(#[from] PushError),
}

/// Why an update produced no notification.
///
/// All of these are normal outcomes, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The update was not an unassigned -> assigned transition.
    NotANewAssignment,
    /// No profile is registered under the assigned driver id.
    ProfileNotFound,
    /// The profile exists but carries no device token.
    NoDeviceToken,
}

/// Outcome of handling one order update event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A notification was submitted for delivery to the named driver.
    Notified { driver_id: String },
    /// The update required no notification.
    Skipped(SkipReason),
}

/// Decide whether an update assigns a driver to a previously unassigned
/// order, returning the newly assigned driver id on a match.
///
/// Reassignments (one non-empty driver id replaced by another) do not
/// count: the order must have started with no driver.
pub fn new_assignment<'a>(before: &OrderSnapshot, after: &'a OrderSnapshot) -> Option<&'a str> {
    if before.driver_id().is_some() {
        return None;
    }
    after.driver_id()
}

/// AssignmentWatcher handles order update events.
pub struct AssignmentWatcher {
    store: Arc<dyn ProfileStore>,
    push: Arc<dyn PushTransport>,
}

impl AssignmentWatcher {
    /// Create a new AssignmentWatcher.
    ///
    /// # Arguments
    ///
    /// * `store` - Driver profile lookup
    /// * `push` - Push delivery transport
    pub fn new(store: Arc<dyn ProfileStore>, push: Arc<dyn PushTransport>) -> Self {
        Self { store, push }
    }

    /// Handle one update to an order record.
    ///
    /// `before` and `after` are the document states on either side of the
    /// write. A missing profile and a missing token are expected outcomes
    /// and return `Skipped`, not an error; only the profile lookup and the
    /// send itself can fail.
    pub async fn handle_update(
        &self,
        order_id: &str,
        before: &OrderSnapshot,
        after: &OrderSnapshot,
    ) -> Result<DispatchOutcome, WatchError> {
        let Some(driver_id) = new_assignment(before, after) else {
            debug!(order_id = %order_id, "update is not a new assignment");
            return Ok(DispatchOutcome::Skipped(SkipReason::NotANewAssignment));
        };

        let Some(profile) = self.store.find_by_email(driver_id).await? else {
            debug!(
                order_id = %order_id,
                driver_id = %driver_id,
                "no profile registered for assigned driver"
            );
            return Ok(DispatchOutcome::Skipped(SkipReason::ProfileNotFound));
        };

        let Some(token) = profile.device_token() else {
            debug!(
                order_id = %order_id,
                driver_id = %driver_id,
                "assigned driver has no device token"
            );
            return Ok(DispatchOutcome::Skipped(SkipReason::NoDeviceToken));
        };

        let payload = NotificationPayload::new_assignment();
        self.push.send(token, &payload).await?;

        info!(
            order_id = %order_id,
            driver_id = %driver_id,
            "notification sent to assigned driver"
        );

        Ok(DispatchOutcome::Notified {
            driver_id: driver_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::driver_profile::DriverProfile;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    fn snap(value: Value) -> OrderSnapshot {
        match value {
            Value::Object(fields) => OrderSnapshot::new(fields),
            _ => OrderSnapshot::default(),
        }
    }

    /// Profile store over a fixed list, recording every lookup.
    struct FakeStore {
        profiles: Vec<DriverProfile>,
        lookups: Mutex<Vec<String>>,
    }

    impl FakeStore {
        fn new(profiles: Vec<DriverProfile>) -> Self {
            Self {
                profiles,
                lookups: Mutex::new(Vec::new()),
            }
        }

        fn empty() -> Self {
            Self::new(Vec::new())
        }

        fn lookups(&self) -> Vec<String> {
            self.lookups.lock().map(|l| l.clone()).unwrap_or_default()
        }

        fn lookup_count(&self) -> usize {
            self.lookups().len()
        }
    }

    #[async_trait]
    impl ProfileStore for FakeStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<DriverProfile>, StoreError> {
            if let Ok(mut lookups) = self.lookups.lock() {
                lookups.push(email.to_string());
            }
            Ok(self.profiles.iter().find(|p| p.email == email).cloned())
        }
    }

    /// Transport that records every send and always succeeds.
    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(String, NotificationPayload)>>,
    }

    impl RecordingTransport {
        fn sent(&self) -> Vec<(String, NotificationPayload)> {
            self.sent.lock().map(|s| s.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl PushTransport for RecordingTransport {
        async fn send(
            &self,
            token: &str,
            payload: &NotificationPayload,
        ) -> Result<(), PushError> {
            if let Ok(mut sent) = self.sent.lock() {
                sent.push((token.to_string(), payload.clone()));
            }
            Ok(())
        }
    }

    /// Transport that always fails delivery.
    struct FailingTransport;

    #[async_trait]
    impl PushTransport for FailingTransport {
        async fn send(
            &self,
            _token: &str,
            _payload: &NotificationPayload,
        ) -> Result<(), PushError> {
            Err(PushError::DeliveryFailed {
                status: 400,
                body: "InvalidRegistration".to_string(),
            })
        }
    }

    fn watcher_with(
        store: Arc<FakeStore>,
        push: Arc<RecordingTransport>,
    ) -> AssignmentWatcher {
        AssignmentWatcher::new(store, push)
    }

    fn carol() -> DriverProfile {
        DriverProfile {
            email: "carol@example.com".to_string(),
            fcm_token: Some("tok123".to_string()),
        }
    }

    #[test]
    fn test_predicate_matches_unassigned_to_assigned() {
        let before = snap(json!({"driverId": ""}));
        let after = snap(json!({"driverId": "carol@example.com"}));
        assert_eq!(new_assignment(&before, &after), Some("carol@example.com"));
    }

    #[test]
    fn test_predicate_matches_absent_to_assigned() {
        let before = snap(json!({"status": "placed"}));
        let after = snap(json!({"status": "placed", "driverId": "carol@example.com"}));
        assert_eq!(new_assignment(&before, &after), Some("carol@example.com"));
    }

    #[test]
    fn test_predicate_rejects_reassignment() {
        let before = snap(json!({"driverId": "carol@example.com"}));
        let after = snap(json!({"driverId": "dave@example.com"}));
        assert_eq!(new_assignment(&before, &after), None);
    }

    #[test]
    fn test_predicate_rejects_unassignment() {
        let before = snap(json!({"driverId": "carol@example.com"}));
        let after = snap(json!({"driverId": ""}));
        assert_eq!(new_assignment(&before, &after), None);
    }

    #[test]
    fn test_predicate_rejects_empty_to_empty() {
        let before = snap(json!({"driverId": ""}));
        let after = snap(json!({"driverId": ""}));
        assert_eq!(new_assignment(&before, &after), None);
    }

    #[test]
    fn test_predicate_ignores_unrelated_field_changes() {
        let before = snap(json!({"driverId": "carol@example.com", "status": "placed"}));
        let after = snap(json!({"driverId": "carol@example.com", "status": "picked_up"}));
        assert_eq!(new_assignment(&before, &after), None);
    }

    #[tokio::test]
    async fn test_happy_path_sends_one_notification() {
        let store = Arc::new(FakeStore::new(vec![carol()]));
        let push = Arc::new(RecordingTransport::default());
        let watcher = watcher_with(store.clone(), push.clone());

        let before = snap(json!({"driverId": ""}));
        let after = snap(json!({"driverId": "carol@example.com"}));
        let outcome = watcher.handle_update("order-1", &before, &after).await;

        assert!(matches!(
            outcome,
            Ok(DispatchOutcome::Notified { ref driver_id }) if driver_id == "carol@example.com"
        ));
        assert_eq!(store.lookups(), vec!["carol@example.com".to_string()]);

        let sent = push.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "tok123");
        assert_eq!(sent[0].1.title, "🛵 New Delivery Assigned");
        assert_eq!(sent[0].1.body, "You have a new order to deliver!");
    }

    #[tokio::test]
    async fn test_reassignment_does_not_look_up_or_send() {
        let store = Arc::new(FakeStore::new(vec![carol()]));
        let push = Arc::new(RecordingTransport::default());
        let watcher = watcher_with(store.clone(), push.clone());

        let before = snap(json!({"driverId": "carol@example.com"}));
        let after = snap(json!({"driverId": "dave@example.com"}));
        let outcome = watcher.handle_update("order-2", &before, &after).await;

        assert!(matches!(
            outcome,
            Ok(DispatchOutcome::Skipped(SkipReason::NotANewAssignment))
        ));
        assert_eq!(store.lookup_count(), 0);
        assert!(push.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unassignment_does_not_look_up_or_send() {
        let store = Arc::new(FakeStore::new(vec![carol()]));
        let push = Arc::new(RecordingTransport::default());
        let watcher = watcher_with(store.clone(), push.clone());

        let before = snap(json!({"driverId": "carol@example.com"}));
        let after = snap(json!({"driverId": ""}));
        let outcome = watcher.handle_update("order-3", &before, &after).await;

        assert!(matches!(
            outcome,
            Ok(DispatchOutcome::Skipped(SkipReason::NotANewAssignment))
        ));
        assert_eq!(store.lookup_count(), 0);
        assert!(push.sent().is_empty());
    }

    #[tokio::test]
    async fn test_missing_profile_skips_without_error() {
        let store = Arc::new(FakeStore::empty());
        let push = Arc::new(RecordingTransport::default());
        let watcher = watcher_with(store.clone(), push.clone());

        let before = snap(json!({"driverId": ""}));
        let after = snap(json!({"driverId": "alice@example.com"}));
        let outcome = watcher.handle_update("order-4", &before, &after).await;

        assert!(matches!(
            outcome,
            Ok(DispatchOutcome::Skipped(SkipReason::ProfileNotFound))
        ));
        assert_eq!(store.lookup_count(), 1);
        assert!(push.sent().is_empty());
    }

    #[tokio::test]
    async fn test_missing_token_skips_without_error() {
        let store = Arc::new(FakeStore::new(vec![DriverProfile {
            email: "bob@example.com".to_string(),
            fcm_token: None,
        }]));
        let push = Arc::new(RecordingTransport::default());
        let watcher = watcher_with(store.clone(), push.clone());

        let before = snap(json!({"driverId": ""}));
        let after = snap(json!({"driverId": "bob@example.com"}));
        let outcome = watcher.handle_update("order-5", &before, &after).await;

        assert!(matches!(
            outcome,
            Ok(DispatchOutcome::Skipped(SkipReason::NoDeviceToken))
        ));
        assert!(push.sent().is_empty());
    }

    #[tokio::test]
    async fn test_empty_token_skips_without_error() {
        let store = Arc::new(FakeStore::new(vec![DriverProfile {
            email: "bob@example.com".to_string(),
            fcm_token: Some(String::new()),
        }]));
        let push = Arc::new(RecordingTransport::default());
        let watcher = watcher_with(store.clone(), push.clone());

        let before = snap(json!({"driverId": ""}));
        let after = snap(json!({"driverId": "bob@example.com"}));
        let outcome = watcher.handle_update("order-6", &before, &after).await;

        assert!(matches!(
            outcome,
            Ok(DispatchOutcome::Skipped(SkipReason::NoDeviceToken))
        ));
        assert!(push.sent().is_empty());
    }

    #[tokio::test]
    async fn test_replay_reaches_same_decision() {
        let store = Arc::new(FakeStore::new(vec![carol()]));
        let push = Arc::new(RecordingTransport::default());
        let watcher = watcher_with(store.clone(), push.clone());

        let before = snap(json!({"driverId": ""}));
        let after = snap(json!({"driverId": "carol@example.com"}));

        let first = watcher.handle_update("order-7", &before, &after).await;
        let second = watcher.handle_update("order-7", &before, &after).await;

        assert!(matches!(first, Ok(DispatchOutcome::Notified { .. })));
        assert!(matches!(second, Ok(DispatchOutcome::Notified { .. })));
        // At-least-once: the replay sends a duplicate.
        assert_eq!(push.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_delivery_failure_propagates() {
        let store = Arc::new(FakeStore::new(vec![carol()]));
        let watcher = AssignmentWatcher::new(store, Arc::new(FailingTransport));

        let before = snap(json!({"driverId": ""}));
        let after = snap(json!({"driverId": "carol@example.com"}));
        let outcome = watcher.handle_update("order-8", &before, &after).await;

        assert!(matches!(
            outcome,
            Err(WatchError::Push(PushError::DeliveryFailed { status: 400, .. }))
        ));
    }
}
