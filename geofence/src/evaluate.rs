//! Geo-fence evaluation.
//!
//! Given a point and a fence snapshot, produce the alerts it triggers.  This is a pure
//! function: no state, no clock (the timestamp is an input), no I/O.  Persisting the alerts
//! and queueing notifications is up to the caller.
//!
//! | kind         | severity | title                   |
//! |--------------|----------|-------------------------|
//! | `restricted` | high     | "Restricted Area Alert" |
//! | `high_risk`  | medium   | "High-Risk Area Alert"  |
//! | anything else| none     | no alert                |
//!

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::{Alert, AlertKind, Coordinate, FenceKind, GeoError, GeoFence, Severity};

/// Validate the point and every fence before doing anything.
///
fn validate_all(point: &Coordinate, fences: &[GeoFence]) -> Result<(), GeoError> {
    point.validate()?;
    fences.iter().try_for_each(|f| f.validate())
}

/// Alert for a point inside `fence`, if its kind calls for one.
///
fn alert_for(fence: &GeoFence, point: &Coordinate, at: DateTime<Utc>) -> Option<Alert> {
    let (severity, title, message) = match fence.kind {
        FenceKind::Restricted => (
            Severity::High,
            "Restricted Area Alert",
            format!("You have entered a restricted area: {}", fence.name),
        ),
        FenceKind::HighRisk => (
            Severity::Medium,
            "High-Risk Area Alert",
            format!("Caution: You are in a high-risk area: {}", fence.name),
        ),
        FenceKind::Safe | FenceKind::Other(_) => return None,
    };

    Some(Alert {
        kind: AlertKind::GeoFence,
        severity,
        title: title.to_string(),
        message,
        location: *point,
        geo_fence_id: Some(fence.id.clone()),
        created_at: at,
    })
}

/// Check `point` against every active fence and return the triggered alerts, in fence order.
///
/// Inactive fences are skipped here too, whatever filtering the caller did.
///
#[tracing::instrument(skip(fences), fields(fences = fences.len()))]
pub fn evaluate(
    point: &Coordinate,
    fences: &[GeoFence],
    at: DateTime<Utc>,
) -> Result<Vec<Alert>, GeoError> {
    validate_all(point, fences)?;

    let alerts: Vec<_> = fences
        .iter()
        .filter(|f| f.active && f.contains(point))
        .filter_map(|f| alert_for(f, point, at))
        .collect();

    trace!("{} alert(s)", alerts.len());
    Ok(alerts)
}

/// Is `point` inside any active `safe` fence?
///
pub fn is_in_safe_area(point: &Coordinate, fences: &[GeoFence]) -> Result<bool, GeoError> {
    validate_all(point, fences)?;

    Ok(fences
        .iter()
        .any(|f| f.active && f.kind == FenceKind::Safe && f.contains(point)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_709_287_200, 0).unwrap()
    }

    /// About 2 km north of (10, 10) is 0.018° of latitude away.
    const TWO_KM_LAT: f64 = 2. / 111.195;

    #[test]
    fn test_center_of_restricted_fence() {
        let center = pt(10., 10.);
        let fences = vec![GeoFence::new("r1", "Airbase", center, 1., FenceKind::Restricted)];

        let alerts = evaluate(&center, &fences, now()).unwrap();
        assert_eq!(1, alerts.len());

        let a = &alerts[0];
        assert_eq!(Severity::High, a.severity);
        assert_eq!(AlertKind::GeoFence, a.kind);
        assert_eq!("Restricted Area Alert", a.title);
        assert_eq!("You have entered a restricted area: Airbase", a.message);
        assert_eq!(Some("r1".to_string()), a.geo_fence_id);
        assert_eq!(center, a.location);
        assert_eq!(now(), a.created_at);
    }

    #[test]
    fn test_two_km_outside() {
        let fences = vec![
            GeoFence::new("r1", "Airbase", pt(10., 10.), 1., FenceKind::Restricted),
            GeoFence::new("h1", "Market", pt(10., 10.), 1., FenceKind::HighRisk),
        ];
        let point = pt(10. + 1. / 111.195 + TWO_KM_LAT, 10.);

        let alerts = evaluate(&point, &fences, now()).unwrap();
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_overlapping_fences() {
        let point = pt(10., 10.);
        let fences = vec![
            GeoFence::new("h1", "Market", pt(10.001, 10.), 2., FenceKind::HighRisk),
            GeoFence::new("s1", "Hotel", pt(10., 10.001), 2., FenceKind::Safe),
            GeoFence::new("r1", "Airbase", pt(10., 10.), 1., FenceKind::Restricted),
        ];

        let alerts = evaluate(&point, &fences, now()).unwrap();
        assert_eq!(2, alerts.len());

        // fence order is kept
        assert_eq!(Severity::Medium, alerts[0].severity);
        assert_eq!("High-Risk Area Alert", alerts[0].title);
        assert_eq!("Caution: You are in a high-risk area: Market", alerts[0].message);
        assert_eq!(Severity::High, alerts[1].severity);
    }

    #[test]
    fn test_evaluate_is_pure() {
        let point = pt(10., 10.);
        let fences = vec![
            GeoFence::new("h1", "Market", pt(10.001, 10.), 2., FenceKind::HighRisk),
            GeoFence::new("r1", "Airbase", pt(10., 10.), 1., FenceKind::Restricted),
        ];

        let a = evaluate(&point, &fences, now()).unwrap();
        let b = evaluate(&point, &fences, now()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_inactive_fence_ignored() {
        let center = pt(10., 10.);
        let fences = vec![
            GeoFence::new("r1", "Airbase", center, 1., FenceKind::Restricted).inactive(),
            GeoFence::new("s1", "Hotel", center, 1., FenceKind::Safe).inactive(),
        ];

        assert!(evaluate(&center, &fences, now()).unwrap().is_empty());
        assert!(!is_in_safe_area(&center, &fences).unwrap());
    }

    #[test]
    fn test_boundary_is_inside() {
        let center = pt(0., 0.);
        let point = pt(0., 0.01);
        let radius = point.distance_to(&center);
        let fences = vec![GeoFence::new("r1", "Edge", center, radius, FenceKind::Restricted)];

        assert_eq!(1, evaluate(&point, &fences, now()).unwrap().len());
    }

    #[test]
    fn test_unknown_kind_never_alerts() {
        let center = pt(0., 0.);
        let fences = vec![GeoFence::new(
            "o1",
            "Museum",
            center,
            1.,
            FenceKind::Other("cultural".to_string()),
        )];
        assert!(evaluate(&center, &fences, now()).unwrap().is_empty());
    }

    #[test]
    fn test_bad_fence_fails_fast() {
        let center = pt(0., 0.);
        let fences = vec![
            GeoFence::new("r1", "Ok", center, 1., FenceKind::Restricted),
            GeoFence::new("r2", "Broken", center, -3., FenceKind::Restricted),
        ];
        assert!(matches!(
            evaluate(&center, &fences, now()),
            Err(GeoError::BadRadius { .. })
        ));
    }

    #[test]
    fn test_safe_area_outside() {
        let fences = vec![
            GeoFence::new("s1", "Hotel", pt(10., 10.), 1., FenceKind::Safe),
            GeoFence::new("r1", "Airbase", pt(20., 20.), 50., FenceKind::Restricted),
        ];
        assert!(!is_in_safe_area(&pt(20., 20.), &fences).unwrap());
    }

    #[test]
    fn test_safe_area_inside() {
        // 3 km north of the center of a 5 km safe fence
        let center = pt(10., 10.);
        let point = pt(10. + 3. / 111.195, 10.);
        assert!((2.99..3.01).contains(&center.distance_to(&point)));

        let fences = vec![GeoFence::new("s1", "Hotel", center, 5., FenceKind::Safe)];
        assert!(is_in_safe_area(&point, &fences).unwrap());
    }
}
