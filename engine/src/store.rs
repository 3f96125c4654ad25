//! Collaborators.
//!
//! The engine never talks to a database or an external service directly, everything goes
//! through one of these traits and is injected at construction time.  The store traits are
//! implemented by [`MemoryStore`](crate::MemoryStore); the capability traits (push messaging,
//! emergency calls, ledger) have no implementation in here and must be supplied by the caller.
//!

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use tourguard_geofence::{Alert, GeoFence, LocationSample};

use crate::{
    DigitalId, EmergencyContact, EngineError, LedgerReceipt, Notification, NotificationStatus,
    PushPayload, StoredAlert, UserProfile,
};

/// Source of geo-fences.  Every call returns the full active set, nothing is cached.
///
#[async_trait]
pub trait FenceStore: Send + Sync {
    async fn active_fences(&self) -> Result<Vec<GeoFence>, EngineError>;
}

#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn add_alert(&self, alert: &StoredAlert) -> Result<(), EngineError>;
    async fn get_alert(&self, user_id: &str, alert_id: &str) -> Result<StoredAlert, EngineError>;
    /// All alerts created at or after `since`.
    async fn alerts_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Alert>, EngineError>;
    async fn mark_notified(
        &self,
        user_id: &str,
        alert_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), EngineError>;
}

#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn add_location(&self, sample: &LocationSample) -> Result<(), EngineError>;
    /// The `n` most recent samples, most recent first.
    async fn recent_locations(
        &self,
        user_id: &str,
        n: usize,
    ) -> Result<Vec<LocationSample>, EngineError>;
    /// Every user with at least one stored sample.
    async fn users(&self) -> Result<Vec<String>, EngineError>;
    /// Remove samples strictly older than `cutoff`, returns how many went away.
    async fn purge_locations_before(
        &self,
        user_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<usize, EngineError>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn enqueue(&self, notification: &Notification) -> Result<(), EngineError>;
    async fn get_notification(&self, id: &str) -> Result<Notification, EngineError>;
    /// Every notification still waiting for delivery, oldest first.
    async fn pending(&self) -> Result<Vec<Notification>, EngineError>;
    async fn update_status(&self, id: &str, status: NotificationStatus)
        -> Result<(), EngineError>;
    /// Remove notifications created strictly before `cutoff`, returns how many went away.
    async fn purge_notifications_before(&self, cutoff: DateTime<Utc>)
        -> Result<usize, EngineError>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn profile(&self, user_id: &str) -> Result<UserProfile, EngineError>;
    async fn emergency_contacts(&self, user_id: &str)
        -> Result<Vec<EmergencyContact>, EngineError>;
}

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn put_digital_id(&self, id: &DigitalId) -> Result<(), EngineError>;
}

// -----

/// Push-messaging service.  Returns the message id assigned by the service.
///
#[async_trait]
pub trait PushMessenger: Send + Sync {
    async fn send(&self, payload: &PushPayload) -> Result<String, EngineError>;
}

/// SMS/e-mail gateway used to reach a user's emergency contacts.
///
#[async_trait]
pub trait EmergencyNotifier: Send + Sync {
    async fn notify_contact(
        &self,
        contact: &EmergencyContact,
        user: &UserProfile,
        alert: &StoredAlert,
    ) -> Result<(), EngineError>;
}

/// Local emergency services.
///
#[async_trait]
pub trait AuthorityNotifier: Send + Sync {
    async fn notify_authorities(
        &self,
        user: &UserProfile,
        alert: &StoredAlert,
    ) -> Result<(), EngineError>;
}

/// Ledger holding digital identities.
///
#[async_trait]
pub trait LedgerRegistry: Send + Sync {
    /// Address to register `user_id` under.
    async fn address_for(&self, user_id: &str, at: DateTime<Utc>) -> Result<String, EngineError>;
    /// Record `action` for `subject` and return the transaction receipt.
    async fn record(&self, action: &str, subject: &str) -> Result<LedgerReceipt, EngineError>;
}
