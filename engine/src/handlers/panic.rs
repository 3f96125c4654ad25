//! Panic button handling.
//!

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{info, trace, warn};

use tourguard_geofence::{Alert, AlertKind, Coordinate};

use crate::{Engine, EngineError, PanicOutcome, StoredAlert};

impl Engine {
    /// Record a panic alert for `user_id` then handle it right away.
    ///
    #[tracing::instrument(skip(self))]
    pub async fn raise_panic(
        &self,
        user_id: &str,
        location: Coordinate,
        at: DateTime<Utc>,
    ) -> Result<(StoredAlert, PanicOutcome), EngineError> {
        location.validate()?;

        let stored = self
            .save_alert_and_notify(user_id, Alert::panic(location, at))
            .await?;
        let outcome = self.on_panic(user_id, &stored.id, at).await?;
        Ok((stored, outcome))
    }

    /// Reach every emergency contact of `user_id` and the authorities for a panic alert.
    ///
    /// Alerts of any other kind are left alone.  A failing contact or authority is logged and
    /// counted, the alert is marked as notified anyway.
    ///
    #[tracing::instrument(skip(self))]
    pub async fn on_panic(
        &self,
        user_id: &str,
        alert_id: &str,
        now: DateTime<Utc>,
    ) -> Result<PanicOutcome, EngineError> {
        trace!("enter");

        let alert = self.svc.alerts.get_alert(user_id, alert_id).await?;
        if alert.alert.kind != AlertKind::PanicButton {
            trace!("not a panic alert ({}), ignoring", alert.alert.kind);
            return Ok(PanicOutcome::Ignored);
        }

        let (user, contacts) = tokio::try_join!(
            self.svc.users.profile(user_id),
            self.svc.users.emergency_contacts(user_id),
        )?;

        let mut calls = contacts
            .iter()
            .map(|c| self.svc.contacts.notify_contact(c, &user, &alert))
            .collect::<Vec<_>>();
        calls.push(self.svc.authorities.notify_authorities(&user, &alert));

        let results = join_all(calls).await;
        let failed = results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .inspect(|e| warn!("emergency notification failed: {e}"))
            .count();

        self.svc.alerts.mark_notified(user_id, alert_id, now).await?;

        info!(
            "panic alert {alert_id}: {} contact(s), {failed} failure(s)",
            contacts.len()
        );
        Ok(PanicOutcome::Notified {
            contacts: contacts.len(),
            failed,
        })
    }
}
