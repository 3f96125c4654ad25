//! The `Engine` ties the pure core to the injected collaborators.
//!
//! It is the explicit replacement for database triggers: the ingestion layer calls
//! `on_location()` for every new sample, `on_panic()` for every new alert, `dispatch()` for
//! every queued notification, and so on.  The handlers themselves are in `handlers/`.
//!

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::{
    AlertStore, AuthorityNotifier, EmergencyNotifier, EngineConfig, FenceStore, IdentityStore,
    LedgerRegistry, LocationStore, MemoryStore, NotificationStore, PushMessenger, UserDirectory,
};

/// Every service the handlers need.
///
#[derive(Clone)]
pub struct Collaborators {
    pub fences: Arc<dyn FenceStore>,
    pub alerts: Arc<dyn AlertStore>,
    pub locations: Arc<dyn LocationStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub users: Arc<dyn UserDirectory>,
    pub identities: Arc<dyn IdentityStore>,
    pub push: Arc<dyn PushMessenger>,
    pub contacts: Arc<dyn EmergencyNotifier>,
    pub authorities: Arc<dyn AuthorityNotifier>,
    pub ledger: Arc<dyn LedgerRegistry>,
}

impl Collaborators {
    /// Use `store` for all persistence, fences included, and the given external services.
    ///
    pub fn from_memory(
        store: Arc<MemoryStore>,
        push: Arc<dyn PushMessenger>,
        contacts: Arc<dyn EmergencyNotifier>,
        authorities: Arc<dyn AuthorityNotifier>,
        ledger: Arc<dyn LedgerRegistry>,
    ) -> Self {
        Collaborators {
            fences: store.clone(),
            alerts: store.clone(),
            locations: store.clone(),
            notifications: store.clone(),
            users: store.clone(),
            identities: store,
            push,
            contacts,
            authorities,
            ledger,
        }
    }

    /// Swap the fence source, e.g. for a `FileFenceStore`.
    ///
    pub fn with_fences(self, fences: Arc<dyn FenceStore>) -> Self {
        Collaborators { fences, ..self }
    }
}

/// Cheap to clone, can be shared between tasks.
///
#[derive(Clone)]
pub struct Engine {
    pub(crate) config: Arc<EngineConfig>,
    pub(crate) svc: Collaborators,
}

impl Engine {
    pub fn new(config: EngineConfig, svc: Collaborators) -> Self {
        Engine {
            config: Arc::new(config),
            svc,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Debug for Engine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("svc", &String::from("collaborators"))
            .finish()
    }
}
