//! Digital tourist identities.
//!

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{info, trace};

use crate::{AuditEntry, DigitalId, DigitalIdStatus, Engine, EngineError};

/// Ledger action recorded when an identity is issued.
const CREATED: &str = "Digital ID Created";

impl Engine {
    /// Issue a digital identity for `user_id`, registered on the ledger and pending
    /// verification.
    ///
    /// Every document listed in `required_documents` must be present in `documents`.
    ///
    #[tracing::instrument(skip(self, personal_info, documents))]
    pub async fn issue_digital_id(
        &self,
        user_id: &str,
        personal_info: BTreeMap<String, String>,
        documents: BTreeMap<String, String>,
        now: DateTime<Utc>,
    ) -> Result<DigitalId, EngineError> {
        trace!("enter");

        let expires_at = self.config.id_expiry(now)?;

        let missing = self
            .config
            .required_documents
            .iter()
            .filter(|d| !documents.contains_key(*d))
            .cloned()
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(EngineError::MissingDocuments(missing));
        }

        let ledger_address = self.svc.ledger.address_for(user_id, now).await?;
        let receipt = self.svc.ledger.record(CREATED, &ledger_address).await?;

        let id = DigitalId {
            id: format!("did_{user_id}_{}", now.timestamp_millis()),
            user_id: user_id.to_string(),
            ledger_address,
            personal_info,
            documents,
            status: DigitalIdStatus::PendingVerification,
            issued_at: now,
            expires_at,
            audit_trail: vec![AuditEntry {
                action: CREATED.to_string(),
                at: now,
                details: "Digital Tourist ID created and submitted for verification".to_string(),
                receipt,
            }],
        };
        self.svc.identities.put_digital_id(&id).await?;

        info!("digital id {} issued at {}", id.id, id.ledger_address);
        Ok(id)
    }
}
