//! Fake external services and a ready-to-use engine for the handler tests.
//!

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use tourguard_geofence::Coordinate;

use crate::{
    load_fences, AuthorityNotifier, Collaborators, EmergencyContact, EmergencyNotifier, Engine,
    EngineConfig, EngineError, LedgerReceipt, LedgerRegistry, MemoryStore, PushMessenger,
    PushPayload, StoredAlert, UserProfile,
};

pub(crate) fn now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_709_287_200, 0).unwrap()
}

/// Inside the built-in restricted fence and nothing else.
pub(crate) fn red_fort() -> Coordinate {
    Coordinate::new(28.6562, 77.2410).unwrap()
}

/// Inside the built-in Connaught Place safe area.
pub(crate) fn connaught_place() -> Coordinate {
    Coordinate::new(28.6315, 77.2167).unwrap()
}

#[derive(Debug, Default)]
pub(crate) struct FakePush {
    pub fail: AtomicBool,
    pub sent: Mutex<Vec<PushPayload>>,
}

#[async_trait]
impl PushMessenger for FakePush {
    async fn send(&self, payload: &PushPayload) -> Result<String, EngineError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(EngineError::Capability("push service unavailable".to_string()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(payload.clone());
        Ok(format!("msg-{}", sent.len()))
    }
}

/// Counts calls, fails for every contact whose phone is empty.
#[derive(Debug, Default)]
pub(crate) struct FakeNotifier {
    pub contacts: AtomicUsize,
    pub authorities: AtomicUsize,
    pub authorities_down: AtomicBool,
}

#[async_trait]
impl EmergencyNotifier for FakeNotifier {
    async fn notify_contact(
        &self,
        contact: &EmergencyContact,
        _user: &UserProfile,
        _alert: &StoredAlert,
    ) -> Result<(), EngineError> {
        self.contacts.fetch_add(1, Ordering::Relaxed);
        if contact.phone.is_empty() {
            return Err(EngineError::Capability(format!("no phone for {}", contact.name)));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthorityNotifier for FakeNotifier {
    async fn notify_authorities(
        &self,
        _user: &UserProfile,
        _alert: &StoredAlert,
    ) -> Result<(), EngineError> {
        self.authorities.fetch_add(1, Ordering::Relaxed);
        if self.authorities_down.load(Ordering::Relaxed) {
            return Err(EngineError::Capability("dispatch line busy".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeLedger {
    pub blocks: AtomicUsize,
}

#[async_trait]
impl LedgerRegistry for FakeLedger {
    async fn address_for(&self, user_id: &str, at: DateTime<Utc>) -> Result<String, EngineError> {
        Ok(format!("0x{user_id}{:x}", at.timestamp()))
    }

    async fn record(&self, action: &str, subject: &str) -> Result<LedgerReceipt, EngineError> {
        let block = self.blocks.fetch_add(1, Ordering::Relaxed) as u64 + 1;
        Ok(LedgerReceipt {
            transaction_hash: format!("0x{}{}", action.len(), subject.len()),
            block_number: block,
        })
    }
}

pub(crate) struct Fakes {
    pub push: Arc<FakePush>,
    pub notifier: Arc<FakeNotifier>,
    pub ledger: Arc<FakeLedger>,
}

/// Engine with default configuration, the built-in fences and user `u1` having a push token
/// and two emergency contacts.
pub(crate) async fn setup() -> (Engine, Arc<MemoryStore>, Fakes) {
    setup_with(EngineConfig::default()).await
}

pub(crate) async fn setup_with(config: EngineConfig) -> (Engine, Arc<MemoryStore>, Fakes) {
    let store = Arc::new(MemoryStore::with_fences(load_fences(None).unwrap()));
    store
        .add_user(
            UserProfile {
                user_id: "u1".to_string(),
                name: "Asha".to_string(),
                push_token: Some("token-u1".to_string()),
            },
            vec![
                EmergencyContact {
                    name: "Ravi".to_string(),
                    phone: "+91 98100 00001".to_string(),
                    email: None,
                },
                EmergencyContact {
                    name: "Meera".to_string(),
                    phone: "+91 98100 00002".to_string(),
                    email: Some("meera@example.com".to_string()),
                },
            ],
        )
        .await;

    let fakes = Fakes {
        push: Arc::new(FakePush::default()),
        notifier: Arc::new(FakeNotifier::default()),
        ledger: Arc::new(FakeLedger::default()),
    };
    let svc = Collaborators::from_memory(
        store.clone(),
        fakes.push.clone(),
        fakes.notifier.clone(),
        fakes.notifier.clone(),
        fakes.ledger.clone(),
    );
    (Engine::new(config, svc), store, fakes)
}
