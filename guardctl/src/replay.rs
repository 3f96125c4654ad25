//! Scenario replay.
//!
//! A scenario is a JSON file with the users involved and a list of timestamped events.  Every
//! event is fed to an in-memory [`Engine`] in order and its result is printed as one JSON line:
//!
//! ```json
//! {
//!   "users": [
//!     { "userId": "u1", "name": "Asha", "pushToken": "tok-1",
//!       "contacts": [ { "name": "Ravi", "phone": "+91 98100 00001", "email": null } ] }
//!   ],
//!   "events": [
//!     { "type": "location", "userId": "u1",
//!       "location": { "latitude": 28.6562, "longitude": 77.241 },
//!       "timestamp": "2024-03-01T10:00:00Z" },
//!     { "type": "panic", "userId": "u1",
//!       "location": { "latitude": 28.6562, "longitude": 77.241 },
//!       "timestamp": "2024-03-01T10:05:00Z" },
//!     { "type": "dispatch", "timestamp": "2024-03-01T10:06:00Z" },
//!     { "type": "score", "userId": "u1", "timestamp": "2024-03-01T11:00:00Z" },
//!     { "type": "issueId", "userId": "u1", "documents": { "passport": "p.pdf", "visa": "v.pdf" },
//!       "timestamp": "2024-03-01T12:00:00Z" },
//!     { "type": "cleanup", "timestamp": "2024-04-15T00:00:00Z" }
//!   ]
//! }
//! ```
//!
//! External services are replaced by local implementations that only log what they would do.
//!

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, trace};

use tourguard_engine::{
    AuthorityNotifier, Collaborators, EmergencyContact, EmergencyNotifier, Engine, EngineConfig,
    EngineError, FenceStore, LedgerReceipt, LedgerRegistry, MemoryStore, PanicOutcome,
    PushMessenger, PushPayload, StoredAlert, UserProfile,
};
use tourguard_geofence::{Coordinate, LocationSample};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioUser {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(default)]
    pub contacts: Vec<EmergencyContact>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    #[serde(rename_all = "camelCase")]
    Location {
        user_id: String,
        location: Coordinate,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Panic {
        user_id: String,
        location: Coordinate,
        timestamp: DateTime<Utc>,
    },
    Dispatch {
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Score {
        user_id: String,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    IssueId {
        user_id: String,
        #[serde(default)]
        personal_info: BTreeMap<String, String>,
        #[serde(default)]
        documents: BTreeMap<String, String>,
        timestamp: DateTime<Utc>,
    },
    Cleanup {
        timestamp: DateTime<Utc>,
    },
}

#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub users: Vec<ScenarioUser>,
    pub events: Vec<Event>,
}

impl Scenario {
    #[tracing::instrument]
    pub fn load(fname: &Path) -> Result<Self> {
        let data = fs::read_to_string(fname)?;
        Ok(serde_json::from_str(&data)?)
    }
}

// -----

/// Push messenger that logs and hands out sequential message ids.
///
#[derive(Debug, Default)]
struct LogPush {
    next: AtomicU64,
}

#[async_trait]
impl PushMessenger for LogPush {
    async fn send(&self, payload: &PushPayload) -> Result<String, EngineError> {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            "push to {} on {}: {}",
            payload.token, payload.android.notification.channel_id, payload.notification.title
        );
        Ok(format!("local-{n}"))
    }
}

#[derive(Debug, Default)]
struct LogNotifier;

#[async_trait]
impl EmergencyNotifier for LogNotifier {
    async fn notify_contact(
        &self,
        contact: &EmergencyContact,
        user: &UserProfile,
        alert: &StoredAlert,
    ) -> Result<(), EngineError> {
        info!(
            "calling {} ({}) for {}: {}",
            contact.name, contact.phone, user.name, alert.alert.message
        );
        Ok(())
    }
}

#[async_trait]
impl AuthorityNotifier for LogNotifier {
    async fn notify_authorities(
        &self,
        user: &UserProfile,
        alert: &StoredAlert,
    ) -> Result<(), EngineError> {
        info!(
            "authorities notified for {} at {:?}",
            user.name, alert.alert.location
        );
        Ok(())
    }
}

/// Ledger keeping a block counter and nothing else.
///
#[derive(Debug, Default)]
struct LocalLedger {
    block: AtomicU64,
}

#[async_trait]
impl LedgerRegistry for LocalLedger {
    async fn address_for(&self, user_id: &str, at: DateTime<Utc>) -> Result<String, EngineError> {
        Ok(format!("0x{:x}{}", at.timestamp(), user_id))
    }

    async fn record(&self, action: &str, subject: &str) -> Result<LedgerReceipt, EngineError> {
        let block_number = self.block.fetch_add(1, Ordering::Relaxed) + 1;
        trace!("{action} for {subject} in block {block_number}");
        Ok(LedgerReceipt {
            transaction_hash: format!("0x{block_number:064x}"),
            block_number,
        })
    }
}

// -----

/// Build the engine for `scenario`, every user is registered beforehand.
///
pub async fn replay_engine(
    cfg: EngineConfig,
    fences: Arc<dyn FenceStore>,
    scenario: &Scenario,
) -> Result<(Engine, Arc<MemoryStore>)> {
    let store = Arc::new(MemoryStore::new());
    for u in &scenario.users {
        store.add_user(u.profile.clone(), u.contacts.clone()).await;
    }

    let notifier = Arc::new(LogNotifier);
    let svc = Collaborators::from_memory(
        store.clone(),
        Arc::new(LogPush::default()),
        notifier.clone(),
        notifier,
        Arc::new(LocalLedger::default()),
    )
    .with_fences(fences);
    Ok((Engine::new(cfg, svc), store))
}

/// Run one event, returns its result as JSON.
///
#[tracing::instrument(skip(engine))]
pub async fn run_event(engine: &Engine, event: &Event) -> Result<Value> {
    let res = match event {
        Event::Location {
            user_id,
            location,
            timestamp,
        } => {
            let sample = LocationSample::new(user_id, *location, *timestamp);
            let alerts = engine.ingest_location(&sample).await?;
            json!({ "event": "location", "userId": user_id, "alerts": alerts })
        }
        Event::Panic {
            user_id,
            location,
            timestamp,
        } => {
            let (alert, outcome) = engine.raise_panic(user_id, *location, *timestamp).await?;
            let (contacts, failed) = match outcome {
                PanicOutcome::Notified { contacts, failed } => (contacts, failed),
                PanicOutcome::Ignored => (0, 0),
            };
            json!({
                "event": "panic",
                "userId": user_id,
                "alert": alert,
                "contacts": contacts,
                "failed": failed,
            })
        }
        Event::Dispatch { timestamp } => {
            let sent = engine.dispatch_pending(*timestamp).await?;
            json!({ "event": "dispatch", "sent": sent })
        }
        Event::Score { user_id, timestamp } => {
            let score = engine.safety_score(user_id, *timestamp).await?;
            json!({ "event": "score", "userId": user_id, "score": score })
        }
        Event::IssueId {
            user_id,
            personal_info,
            documents,
            timestamp,
        } => {
            let id = engine
                .issue_digital_id(
                    user_id,
                    personal_info.clone(),
                    documents.clone(),
                    *timestamp,
                )
                .await?;
            json!({ "event": "issueId", "digitalId": id })
        }
        Event::Cleanup { timestamp } => {
            let stats = engine.cleanup(*timestamp).await?;
            json!({
                "event": "cleanup",
                "users": stats.users,
                "locations": stats.locations,
                "notifications": stats.notifications,
            })
        }
    };
    Ok(res)
}

/// Replay every event of `scenario` in order.  The first failing event stops the replay.
///
#[tracing::instrument(skip_all)]
pub async fn replay(engine: &Engine, scenario: &Scenario) -> Result<Vec<Value>> {
    let mut out = Vec::with_capacity(scenario.events.len());
    for event in &scenario.events {
        out.push(run_event(engine, event).await?);
    }
    info!("{} event(s) replayed", out.len());
    Ok(out)
}
