//! Geo-fence evaluation and safety scoring.
//!
//! Everything in here is synchronous and side-effect free, so it can be called from as many
//! requests as needed without any locking:
//!
//! - [`distance`] is the haversine great-circle distance in km,
//! - [`evaluate`] turns a point and a fence snapshot into [`Alert`]s,
//! - [`is_in_safe_area`] checks membership in active `safe` fences,
//! - [`safety_score`] aggregates recent alerts and locations into a score in [0, 100].
//!
//! ```rust
//! use chrono::Utc;
//! use tourguard_geofence::{evaluate, Coordinate, FenceKind, GeoFence};
//!
//! let center = Coordinate::new(28.6139, 77.2090).unwrap();
//! let fences = vec![GeoFence::new("r1", "Airbase", center, 1., FenceKind::Restricted)];
//!
//! let alerts = evaluate(&center, &fences, Utc::now()).unwrap();
//! assert_eq!(1, alerts.len());
//! ```
//!

mod alert;
mod error;
mod evaluate;
mod fence;
mod location;
mod score;

pub use alert::*;
pub use error::*;
pub use evaluate::*;
pub use fence::*;
pub use location::*;
pub use score::*;

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}
