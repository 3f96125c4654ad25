//! Event handlers around the `tourguard-geofence` core.
//!
//! The [`Engine`] receives every event of interest (new location sample, panic alert, queued
//! notification, periodic cleanup) through an explicit method call and does the work against
//! the collaborators it has been given: stores, push messaging, emergency notifiers and the
//! identity ledger.
//!
//! [`MemoryStore`] implements every store and is what `guardctl replay` and the tests use.
//!

mod config;
mod engine;
mod error;
mod fences;
mod handlers;
mod memory;
mod model;
mod notification;
mod store;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use fences::*;
pub use memory::*;
pub use model::*;
pub use notification::*;
pub use store::*;

const NAME: &str = env!("CARGO_PKG_NAME");
const EVERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> String {
    format!("{}/{}", NAME, EVERSION)
}
