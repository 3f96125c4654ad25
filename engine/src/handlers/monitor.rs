//! Location monitoring: every new sample is checked against the active fences.
//!

use tracing::{error, info, trace};

use tourguard_geofence::{evaluate, Alert, LocationSample};

use crate::{Engine, EngineError, Notification, StoredAlert};

impl Engine {
    /// Store a new sample then run `on_location()` on it.
    ///
    #[tracing::instrument(skip(self, sample), fields(user = %sample.user_id))]
    pub async fn ingest_location(
        &self,
        sample: &LocationSample,
    ) -> Result<Vec<StoredAlert>, EngineError> {
        self.svc.locations.add_location(sample).await?;
        self.on_location(sample).await
    }

    /// Evaluate `sample` against the current active fence set and record every alert it
    /// triggers, along with its notification.
    ///
    #[tracing::instrument(skip(self, sample), fields(user = %sample.user_id))]
    pub async fn on_location(
        &self,
        sample: &LocationSample,
    ) -> Result<Vec<StoredAlert>, EngineError> {
        trace!("enter");

        let fences = self
            .svc
            .fences
            .active_fences()
            .await
            .inspect_err(|e| error!("Geo-fence monitoring error: {e}"))?;

        let alerts = evaluate(&sample.location, &fences, sample.timestamp)?;

        let mut stored = Vec::with_capacity(alerts.len());
        for alert in alerts {
            stored.push(self.save_alert_and_notify(&sample.user_id, alert).await?);
        }

        if !stored.is_empty() {
            info!("{} alert(s) for user {}", stored.len(), sample.user_id);
        }
        Ok(stored)
    }

    /// Persist `alert` and queue the matching notification.
    ///
    pub(crate) async fn save_alert_and_notify(
        &self,
        user_id: &str,
        alert: Alert,
    ) -> Result<StoredAlert, EngineError> {
        let stored = StoredAlert::new(user_id, alert);
        self.svc.alerts.add_alert(&stored).await?;

        let notification = Notification::from_alert(user_id, &stored.alert);
        self.svc.notifications.enqueue(&notification).await?;

        trace!("alert {} queued as {}", stored.id, notification.id);
        Ok(stored)
    }
}
