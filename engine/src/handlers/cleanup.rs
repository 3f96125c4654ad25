use chrono::{DateTime, Utc};
use tracing::{debug, info, trace};

use crate::{CleanupStats, Engine, EngineError};

impl Engine {
    /// Remove location samples and notifications older than `retention_days`.
    ///
    #[tracing::instrument(skip(self))]
    pub async fn cleanup(&self, now: DateTime<Utc>) -> Result<CleanupStats, EngineError> {
        trace!("enter");

        let cutoff = self.config.retention_cutoff(now)?;
        let mut stats = CleanupStats::default();

        for user in self.svc.locations.users().await? {
            let n = self
                .svc
                .locations
                .purge_locations_before(&user, cutoff)
                .await?;
            if n > 0 {
                debug!("Cleaned up {n} old location records for user {user}");
                stats.users += 1;
                stats.locations += n;
            }
        }
        stats.notifications = self
            .svc
            .notifications
            .purge_notifications_before(cutoff)
            .await?;

        info!(
            "cleanup before {cutoff}: {} location(s) for {} user(s), {} notification(s)",
            stats.locations, stats.users, stats.notifications
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use tourguard_geofence::{Coordinate, LocationSample};

    use crate::handlers::testing::{now, red_fort, setup, setup_with};
    use crate::{EngineConfig, LocationStore};

    use super::*;

    #[tokio::test]
    async fn test_cleanup() {
        let (engine, store, _) = setup().await;
        let far = Coordinate::new(0., 0.).unwrap();

        for (user, days) in [("u1", 40), ("u1", 31), ("u1", 1), ("u2", 2)] {
            let at = now() - Duration::days(days);
            store
                .add_location(&LocationSample::new(user, far, at))
                .await
                .unwrap();
        }
        // One old notification, one fresh
        for days in [45, 0] {
            let at = now() - Duration::days(days);
            engine
                .on_location(&LocationSample::new("u1", red_fort(), at))
                .await
                .unwrap();
        }

        let stats = engine.cleanup(now()).await.unwrap();
        assert_eq!(
            CleanupStats {
                users: 1,
                locations: 2,
                notifications: 1
            },
            stats
        );
        assert_eq!(1, store.locations("u1").await.len());
        assert_eq!(1, store.locations("u2").await.len());
        assert_eq!(1, store.notifications().await.len());
    }

    #[tokio::test]
    async fn test_cleanup_bad_retention() {
        for retention_days in [-1, i64::MAX / 2] {
            let cfg = EngineConfig {
                retention_days,
                ..EngineConfig::default()
            };
            let (engine, store, _) = setup_with(cfg).await;
            let sample = LocationSample::new("u1", red_fort(), now());
            engine.ingest_location(&sample).await.unwrap();

            let r = engine.cleanup(now()).await;
            assert!(matches!(r, Err(EngineError::BadConfig(_))));
            assert_eq!(1, store.locations("u1").await.len());
            assert_eq!(1, store.notifications().await.len());
        }
    }

    #[tokio::test]
    async fn test_cleanup_nothing_to_do() {
        let (engine, _, _) = setup().await;
        assert_eq!(CleanupStats::default(), engine.cleanup(now()).await.unwrap());
    }
}
