//! Alerts produced by the evaluator (or by the panic button on the client side).
//!

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{Display as StrumDisplay, EnumString};

use crate::Coordinate;

/// Points removed from the safety score for each alert of a given severity.
///
#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize, StrumDisplay, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Score penalty for one alert of this severity.
    ///
    pub fn penalty(&self) -> i32 {
        match self {
            Severity::High => 15,
            Severity::Medium => 10,
            Severity::Low => 5,
        }
    }
}

/// Alert type tag.
///
#[derive(Clone, Debug, Eq, Hash, PartialEq, DeserializeFromStr, SerializeDisplay)]
pub enum AlertKind {
    GeoFence,
    PanicButton,
    Other(String),
}

impl Display for AlertKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertKind::GeoFence => write!(f, "geo_fence_alert"),
            AlertKind::PanicButton => write!(f, "panic_button"),
            AlertKind::Other(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for AlertKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "geo_fence_alert" => AlertKind::GeoFence,
            "panic_button" => AlertKind::PanicButton,
            _ => AlertKind::Other(s.to_string()),
        })
    }
}

/// One alert.  Never modified once built.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub location: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_fence_id: Option<String>,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// Panic-button alert raised by the user at `location`.
    ///
    pub fn panic(location: Coordinate, at: DateTime<Utc>) -> Self {
        Alert {
            kind: AlertKind::PanicButton,
            severity: Severity::High,
            title: "Emergency".to_string(),
            message: "Panic button pressed".to_string(),
            location,
            geo_fence_id: None,
            created_at: at,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Severity::High, 15, "high")]
    #[case(Severity::Medium, 10, "medium")]
    #[case(Severity::Low, 5, "low")]
    fn test_severity(#[case] sev: Severity, #[case] penalty: i32, #[case] name: &str) {
        assert_eq!(penalty, sev.penalty());
        assert_eq!(name, sev.to_string());
        assert_eq!(sev, name.parse::<Severity>().unwrap());
    }

    #[test]
    fn test_alert_json_names() {
        let loc = Coordinate::new(1., 2.).unwrap();
        let at = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let a = Alert::panic(loc, at);

        let v = serde_json::to_value(&a).unwrap();
        assert_eq!("panic_button", v["type"]);
        assert_eq!("high", v["severity"]);
        assert!(v.get("geoFenceId").is_none());

        let back: Alert = serde_json::from_value(v).unwrap();
        assert_eq!(a, back);
    }
}
