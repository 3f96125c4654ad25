//! Geo-fences are circles (center + radius in km) tagged with a kind.
//!
//! Fences are created and deactivated by an administrative process we know nothing about, we
//! only read them.
//!

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{distance, Coordinate, GeoError};

/// Kind of area a fence describes.  Unknown tags are kept verbatim and never alert.
///
#[derive(Clone, Debug, Eq, Hash, PartialEq, DeserializeFromStr, SerializeDisplay)]
pub enum FenceKind {
    Restricted,
    HighRisk,
    Safe,
    Other(String),
}

impl Display for FenceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FenceKind::Restricted => write!(f, "restricted"),
            FenceKind::HighRisk => write!(f, "high_risk"),
            FenceKind::Safe => write!(f, "safe"),
            FenceKind::Other(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for FenceKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "restricted" => FenceKind::Restricted,
            "high_risk" => FenceKind::HighRisk,
            "safe" => FenceKind::Safe,
            _ => FenceKind::Other(s.to_string()),
        })
    }
}

/// One geo-fence record.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoFence {
    /// Identifier in the fence store
    pub id: String,
    /// Human-readable name, used in alert messages
    pub name: String,
    /// Center of the circle
    pub center: Coordinate,
    /// Radius in kilometers
    pub radius: f64,
    /// Area kind
    #[serde(rename = "type")]
    pub kind: FenceKind,
    /// Only active fences are ever considered
    #[serde(rename = "isActive")]
    pub active: bool,
}

impl GeoFence {
    pub fn new(id: &str, name: &str, center: Coordinate, radius: f64, kind: FenceKind) -> Self {
        GeoFence {
            id: id.to_string(),
            name: name.to_string(),
            center,
            radius,
            kind,
            active: true,
        }
    }

    /// Same fence, deactivated.
    ///
    pub fn inactive(self) -> Self {
        GeoFence {
            active: false,
            ..self
        }
    }

    /// Check that the record is usable: an id, a sane center and a finite non-negative radius.
    ///
    pub fn validate(&self) -> Result<(), GeoError> {
        if self.id.trim().is_empty() {
            return Err(GeoError::MissingFenceId(self.name.clone()));
        }
        self.center.validate()?;
        if !self.radius.is_finite() || self.radius < 0. {
            return Err(GeoError::BadRadius {
                id: self.id.clone(),
                radius: self.radius,
            });
        }
        Ok(())
    }

    /// Is `point` inside the circle?  The border counts as inside.
    ///
    #[inline]
    pub fn contains(&self, point: &Coordinate) -> bool {
        distance(point, &self.center) <= self.radius
    }
}
