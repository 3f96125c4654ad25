use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::{Engine, EngineError};

impl Engine {
    /// Safety score of `user_id` as of `now`, from the alerts of the last `score.days` days and
    /// the `score.recent_locations` most recent samples.
    ///
    #[tracing::instrument(skip(self))]
    pub async fn safety_score(&self, user_id: &str, now: DateTime<Utc>) -> Result<u8, EngineError> {
        trace!("enter");

        let window = self.config.score;
        let since = self.config.score_since(now)?;

        let (alerts, recent, fences) = tokio::try_join!(
            self.svc.alerts.alerts_since(user_id, since),
            self.svc.locations.recent_locations(user_id, window.recent_locations),
            self.svc.fences.active_fences(),
        )?;
        debug!(
            "{} alert(s) since {since}, {} sample(s)",
            alerts.len(),
            recent.len()
        );

        Ok(tourguard_geofence::safety_score(&alerts, &recent, &fences)?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use tourguard_geofence::{Alert, LocationSample};

    use crate::handlers::testing::{connaught_place, now, red_fort, setup, setup_with};
    use crate::{AlertStore, EngineConfig, LocationStore, ScoreWindow, StoredAlert};

    use super::*;

    #[tokio::test]
    async fn test_score_new_user() {
        let (engine, _, _) = setup().await;
        assert_eq!(100, engine.safety_score("nobody", now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_score_counts_recent_alerts_only() {
        let (engine, store, _) = setup().await;

        // One 2 days old, one 10 days old
        for days in [2, 10] {
            let alert = Alert::panic(red_fort(), now() - Duration::days(days));
            store
                .add_alert(&StoredAlert::new("u1", alert))
                .await
                .unwrap();
        }
        assert_eq!(85, engine.safety_score("u1", now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_score_safe_area_bonus() {
        let (engine, store, _) = setup().await;

        let alert = Alert::panic(red_fort(), now());
        store
            .add_alert(&StoredAlert::new("u1", alert))
            .await
            .unwrap();
        for i in 0..8 {
            let at = now() - Duration::minutes(i);
            store
                .add_location(&LocationSample::new("u1", connaught_place(), at))
                .await
                .unwrap();
        }
        // 100 - 15 + 5
        assert_eq!(90, engine.safety_score("u1", now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_score_bad_window() {
        let cfg = EngineConfig {
            score: ScoreWindow {
                days: i64::MAX,
                ..ScoreWindow::default()
            },
            ..EngineConfig::default()
        };
        let (engine, _, _) = setup_with(cfg).await;

        let r = engine.safety_score("u1", now()).await;
        assert!(matches!(r, Err(EngineError::BadConfig(_))));
    }

    #[tokio::test]
    async fn test_score_via_monitoring() {
        let (engine, _, _) = setup().await;

        let sample = LocationSample::new("u1", red_fort(), now());
        engine.ingest_location(&sample).await.unwrap();
        assert_eq!(85, engine.safety_score("u1", now()).await.unwrap());
    }
}
