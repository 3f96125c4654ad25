//! Engine configuration.
//!
//! Read from `engine.hcl` in the default configuration directory (`$HOME/.config/tourguard`) or
//! from an explicit file.  Everything has a default, so the file is optional:
//!
//! ```hcl
//! version = 1
//!
//! retention_days = 30
//! id_validity_days = 365
//! required_documents = ["passport", "visa"]
//! fences = "/etc/tourguard/fences.hcl"
//!
//! score {
//!   days = 7
//!   recent_locations = 10
//! }
//! ```
//!

use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use eyre::Result;
use serde::{Deserialize, Serialize};

use tourguard_common::{ConfigFile, Versioned};
use tourguard_geofence::{ALERT_WINDOW_DAYS, RECENT_LOCATIONS};

use crate::EngineError;

/// Config filename
pub const CONFIG: &str = "engine.hcl";

/// Current version
pub const CVERSION: usize = 1;

/// Upper bound for every day count, roughly a century.
pub const MAX_DAYS: i64 = 36_600;

/// Which history the safety score looks at.
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWindow {
    /// Alerts younger than this many days are counted.
    pub days: i64,
    /// Number of most recent locations checked against safe areas, at most
    /// `RECENT_LOCATIONS` (10).
    pub recent_locations: usize,
}

impl Default for ScoreWindow {
    fn default() -> Self {
        ScoreWindow {
            days: ALERT_WINDOW_DAYS,
            recent_locations: RECENT_LOCATIONS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub version: usize,
    /// Locations and notifications older than this are purged.
    pub retention_days: i64,
    pub score: ScoreWindow,
    /// Documents a digital identity can not be issued without.
    pub required_documents: Vec<String>,
    /// Lifetime of a digital identity.
    pub id_validity_days: i64,
    /// Fence file, the built-in set is used when missing.
    pub fences: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            version: CVERSION,
            retention_days: 30,
            score: ScoreWindow::default(),
            required_documents: vec!["passport".to_string(), "visa".to_string()],
            id_validity_days: 365,
            fences: None,
        }
    }
}

impl Versioned for EngineConfig {
    fn version(&self) -> usize {
        self.version
    }
}

impl EngineConfig {
    /// Load the configuration, defaults if no file is given and none is in the default place.
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&Path>) -> Result<Self> {
        let cfg = ConfigFile::<EngineConfig>::load_or_default(fname, CONFIG, CVERSION)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Every day count must be in `[0, MAX_DAYS]` and the score can not look at more than
    /// `RECENT_LOCATIONS` samples.
    ///
    pub fn validate(&self) -> Result<(), EngineError> {
        days("retention_days", self.retention_days)?;
        days("score.days", self.score.days)?;
        days("id_validity_days", self.id_validity_days)?;
        if self.score.recent_locations > RECENT_LOCATIONS {
            return Err(EngineError::BadConfig(format!(
                "score.recent_locations = {}, at most {RECENT_LOCATIONS}",
                self.score.recent_locations
            )));
        }
        Ok(())
    }

    /// Anything older than this is purged.
    ///
    pub fn retention_cutoff(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, EngineError> {
        shift(now, -days("retention_days", self.retention_days)?)
    }

    /// Start of the alert window used by the safety score.
    ///
    pub fn score_since(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, EngineError> {
        shift(now, -days("score.days", self.score.days)?)
    }

    /// Expiry of a digital identity issued at `now`.
    ///
    pub fn id_expiry(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, EngineError> {
        shift(now, days("id_validity_days", self.id_validity_days)?)
    }
}

fn days(name: &str, n: i64) -> Result<TimeDelta, EngineError> {
    if !(0..=MAX_DAYS).contains(&n) {
        return Err(EngineError::BadConfig(format!(
            "{name} = {n}, must be between 0 and {MAX_DAYS}"
        )));
    }
    TimeDelta::try_days(n).ok_or_else(|| EngineError::BadConfig(format!("{name} = {n}")))
}

fn shift(now: DateTime<Utc>, delta: TimeDelta) -> Result<DateTime<Utc>, EngineError> {
    now.checked_add_signed(delta)
        .ok_or_else(|| EngineError::BadConfig(format!("{now} + {delta} is out of range")))
}
