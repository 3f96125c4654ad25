//! Rolling safety score.
//!
//! Start from 100, remove points for every recent alert, add a small bonus when the user
//! mostly stays in safe areas, then clamp into [0, 100].  Fetching the 7-day alert window
//! and the last locations is the caller's job.
//!

use tracing::debug;

use crate::{is_in_safe_area, Alert, GeoError, GeoFence, LocationSample};

/// Best possible score, also the starting point.
pub const MAX_SCORE: i32 = 100;

/// Alerts older than this are not counted.
pub const ALERT_WINDOW_DAYS: i64 = 7;

/// How many of the most recent locations are checked for safe-area membership.
pub const RECENT_LOCATIONS: usize = 10;

/// Bonus from the number of recent locations spent inside a safe area.
///
pub fn safe_area_bonus(visits: usize) -> i32 {
    match visits {
        8.. => 5,
        5..=7 => 2,
        _ => 0,
    }
}

/// Compute the score.
///
/// `recent` must be ordered most recent first, only the first `RECENT_LOCATIONS` are used,
/// whatever the caller fetched.  Fences and alert locations are checked before anything else.
///
#[tracing::instrument(skip_all, fields(alerts = alerts.len(), recent = recent.len()))]
pub fn safety_score(
    alerts: &[Alert],
    recent: &[LocationSample],
    fences: &[GeoFence],
) -> Result<u8, GeoError> {
    fences.iter().try_for_each(GeoFence::validate)?;
    alerts.iter().try_for_each(|a| a.location.validate())?;

    let penalty: i32 = alerts.iter().map(|a| a.severity.penalty()).sum();

    let visits = recent
        .iter()
        .take(RECENT_LOCATIONS)
        .map(|s| is_in_safe_area(&s.location, fences))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|inside| *inside)
        .count();

    let score = MAX_SCORE - penalty + safe_area_bonus(visits);
    debug!(penalty, visits, score, "raw score");

    Ok(score.clamp(0, MAX_SCORE) as u8)
}
