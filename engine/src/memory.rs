//! In-memory implementation of every store trait.
//!
//! Used by `guardctl replay` and by the tests.  Everything sits behind a single `RwLock`, which
//! is good enough for a few thousand records.
//!

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::trace;

use tourguard_geofence::{Alert, GeoFence, LocationSample};

use crate::{
    AlertStatus, AlertStore, DigitalId, EmergencyContact, EngineError, FenceStore, IdentityStore,
    LocationStore, Notification, NotificationStatus, NotificationStore, StoredAlert,
    UserDirectory, UserProfile,
};

#[derive(Debug, Default)]
struct Inner {
    fences: Vec<GeoFence>,
    alerts: BTreeMap<String, Vec<StoredAlert>>,
    locations: BTreeMap<String, Vec<LocationSample>>,
    notifications: BTreeMap<String, Notification>,
    users: BTreeMap<String, (UserProfile, Vec<EmergencyContact>)>,
    digital_ids: BTreeMap<String, DigitalId>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fences(fences: Vec<GeoFence>) -> Self {
        MemoryStore {
            inner: RwLock::new(Inner {
                fences,
                ..Inner::default()
            }),
        }
    }

    pub async fn set_fences(&self, fences: Vec<GeoFence>) {
        self.inner.write().await.fences = fences;
    }

    pub async fn add_user(&self, profile: UserProfile, contacts: Vec<EmergencyContact>) {
        let mut inner = self.inner.write().await;
        inner
            .users
            .insert(profile.user_id.clone(), (profile, contacts));
    }

    /// Every stored alert of `user_id`, oldest first.
    ///
    pub async fn alerts(&self, user_id: &str) -> Vec<StoredAlert> {
        let inner = self.inner.read().await;
        inner.alerts.get(user_id).cloned().unwrap_or_default()
    }

    /// Every queued notification, by id.
    ///
    pub async fn notifications(&self) -> Vec<Notification> {
        let inner = self.inner.read().await;
        inner.notifications.values().cloned().collect()
    }

    pub async fn locations(&self, user_id: &str) -> Vec<LocationSample> {
        let inner = self.inner.read().await;
        inner.locations.get(user_id).cloned().unwrap_or_default()
    }

    pub async fn digital_id(&self, user_id: &str) -> Option<DigitalId> {
        let inner = self.inner.read().await;
        inner.digital_ids.get(user_id).cloned()
    }
}

#[async_trait]
impl FenceStore for MemoryStore {
    async fn active_fences(&self) -> Result<Vec<GeoFence>, EngineError> {
        let inner = self.inner.read().await;
        Ok(inner.fences.iter().filter(|f| f.active).cloned().collect())
    }
}

#[async_trait]
impl AlertStore for MemoryStore {
    async fn add_alert(&self, alert: &StoredAlert) -> Result<(), EngineError> {
        trace!("add alert {} for {}", alert.id, alert.user_id);
        let mut inner = self.inner.write().await;
        inner
            .alerts
            .entry(alert.user_id.clone())
            .or_default()
            .push(alert.clone());
        Ok(())
    }

    async fn get_alert(&self, user_id: &str, alert_id: &str) -> Result<StoredAlert, EngineError> {
        let inner = self.inner.read().await;
        inner
            .alerts
            .get(user_id)
            .and_then(|v| v.iter().find(|a| a.id == alert_id))
            .cloned()
            .ok_or_else(|| EngineError::UnknownAlert(user_id.to_string(), alert_id.to_string()))
    }

    async fn alerts_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Alert>, EngineError> {
        let inner = self.inner.read().await;
        let all = inner.alerts.get(user_id).map(Vec::as_slice).unwrap_or(&[]);
        Ok(all
            .iter()
            .filter(|a| a.alert.created_at >= since)
            .map(|a| a.alert.clone())
            .collect())
    }

    async fn mark_notified(
        &self,
        user_id: &str,
        alert_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        let mut inner = self.inner.write().await;
        let alert = inner
            .alerts
            .get_mut(user_id)
            .and_then(|v| v.iter_mut().find(|a| a.id == alert_id))
            .ok_or_else(|| EngineError::UnknownAlert(user_id.to_string(), alert_id.to_string()))?;
        alert.status = AlertStatus::Notified { at };
        Ok(())
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn add_location(&self, sample: &LocationSample) -> Result<(), EngineError> {
        let mut inner = self.inner.write().await;
        inner
            .locations
            .entry(sample.user_id.clone())
            .or_default()
            .push(sample.clone());
        Ok(())
    }

    async fn recent_locations(
        &self,
        user_id: &str,
        n: usize,
    ) -> Result<Vec<LocationSample>, EngineError> {
        let inner = self.inner.read().await;
        let mut all = inner.locations.get(user_id).cloned().unwrap_or_default();
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        all.truncate(n);
        Ok(all)
    }

    async fn users(&self) -> Result<Vec<String>, EngineError> {
        let inner = self.inner.read().await;
        Ok(inner.locations.keys().cloned().collect())
    }

    async fn purge_locations_before(
        &self,
        user_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<usize, EngineError> {
        let mut inner = self.inner.write().await;
        let Some(all) = inner.locations.get_mut(user_id) else {
            return Ok(0);
        };
        let before = all.len();
        all.retain(|s| s.timestamp >= cutoff);
        Ok(before - all.len())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn enqueue(&self, notification: &Notification) -> Result<(), EngineError> {
        let mut inner = self.inner.write().await;
        inner
            .notifications
            .insert(notification.id.clone(), notification.clone());
        Ok(())
    }

    async fn get_notification(&self, id: &str) -> Result<Notification, EngineError> {
        let inner = self.inner.read().await;
        inner
            .notifications
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownNotification(id.to_string()))
    }

    async fn pending(&self) -> Result<Vec<Notification>, EngineError> {
        let inner = self.inner.read().await;
        let mut all: Vec<_> = inner
            .notifications
            .values()
            .filter(|n| n.status == NotificationStatus::Pending)
            .cloned()
            .collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    async fn update_status(
        &self,
        id: &str,
        status: NotificationStatus,
    ) -> Result<(), EngineError> {
        let mut inner = self.inner.write().await;
        let n = inner
            .notifications
            .get_mut(id)
            .ok_or_else(|| EngineError::UnknownNotification(id.to_string()))?;
        n.status = status;
        Ok(())
    }

    async fn purge_notifications_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<usize, EngineError> {
        let mut inner = self.inner.write().await;
        let before = inner.notifications.len();
        inner.notifications.retain(|_, n| n.created_at >= cutoff);
        Ok(before - inner.notifications.len())
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn profile(&self, user_id: &str) -> Result<UserProfile, EngineError> {
        let inner = self.inner.read().await;
        inner
            .users
            .get(user_id)
            .map(|(p, _)| p.clone())
            .ok_or_else(|| EngineError::UnknownUser(user_id.to_string()))
    }

    async fn emergency_contacts(
        &self,
        user_id: &str,
    ) -> Result<Vec<EmergencyContact>, EngineError> {
        let inner = self.inner.read().await;
        inner
            .users
            .get(user_id)
            .map(|(_, c)| c.clone())
            .ok_or_else(|| EngineError::UnknownUser(user_id.to_string()))
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn put_digital_id(&self, id: &DigitalId) -> Result<(), EngineError> {
        let mut inner = self.inner.write().await;
        inner.digital_ids.insert(id.user_id.clone(), id.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use tourguard_geofence::{Coordinate, FenceKind};

    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_709_287_200, 0).unwrap()
    }

    fn sample(minutes_ago: i64) -> LocationSample {
        let loc = Coordinate::new(10., 10.).unwrap();
        LocationSample::new("u1", loc, now() - Duration::minutes(minutes_ago))
    }

    #[tokio::test]
    async fn test_active_fences_only() {
        let c = Coordinate::new(0., 0.).unwrap();
        let store = MemoryStore::with_fences(vec![
            GeoFence::new("a", "a", c, 1., FenceKind::Safe),
            GeoFence::new("b", "b", c, 1., FenceKind::Safe).inactive(),
        ]);

        let fences = store.active_fences().await.unwrap();
        assert_eq!(1, fences.len());
        assert_eq!("a", fences[0].id);
    }

    #[tokio::test]
    async fn test_recent_locations_order() {
        let store = MemoryStore::new();
        for m in [30, 10, 20, 0] {
            store.add_location(&sample(m)).await.unwrap();
        }

        let recent = store.recent_locations("u1", 3).await.unwrap();
        assert_eq!(3, recent.len());
        assert_eq!(now(), recent[0].timestamp);
        assert_eq!(now() - Duration::minutes(20), recent[2].timestamp);
    }

    #[tokio::test]
    async fn test_purge_locations() {
        let store = MemoryStore::new();
        for m in [0, 10, 20] {
            store.add_location(&sample(m)).await.unwrap();
        }

        let gone = store
            .purge_locations_before("u1", now() - Duration::minutes(15))
            .await
            .unwrap();
        assert_eq!(1, gone);
        assert_eq!(2, store.locations("u1").await.len());
        assert_eq!(0, store.purge_locations_before("nobody", now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_records() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.profile("ghost").await,
            Err(EngineError::UnknownUser(_))
        ));
        assert!(matches!(
            store.get_alert("ghost", "a1").await,
            Err(EngineError::UnknownAlert(..))
        ));
        assert!(matches!(
            store.get_notification("n1").await,
            Err(EngineError::UnknownNotification(_))
        ));
    }
}
