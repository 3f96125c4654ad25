//! Records owned by the engine, on top of the core ones from `tourguard-geofence`.
//!

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use tourguard_geofence::Alert;

/// Where an alert is in its life.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AlertStatus {
    Pending,
    Notified { at: DateTime<Utc> },
}

/// An alert as persisted for a given user.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAlert {
    pub id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub alert: Alert,
    #[serde(flatten)]
    pub status: AlertStatus,
}

impl StoredAlert {
    pub fn new(user_id: &str, alert: Alert) -> Self {
        StoredAlert {
            id: uuid::Uuid::now_v7().to_string(),
            user_id: user_id.to_string(),
            alert,
            status: AlertStatus::Pending,
        }
    }
}

/// What we know about a user.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    /// Push-messaging registration token, if the device registered one.
    pub push_token: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

/// Result of handling a panic alert.
///
#[derive(Clone, Debug, PartialEq)]
pub enum PanicOutcome {
    /// Not a panic alert, nothing done.
    Ignored,
    /// Contacts and authorities have been called, `failed` of them did not answer.
    Notified { contacts: usize, failed: usize },
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DigitalIdStatus {
    #[default]
    PendingVerification,
    Verified,
    Revoked,
}

/// Receipt returned by the ledger for every recorded action.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReceipt {
    pub transaction_hash: String,
    pub block_number: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub action: String,
    #[serde(rename = "timestamp")]
    pub at: DateTime<Utc>,
    pub details: String,
    #[serde(flatten)]
    pub receipt: LedgerReceipt,
}

/// Digital tourist identity, submitted for verification.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalId {
    pub id: String,
    pub user_id: String,
    pub ledger_address: String,
    pub personal_info: BTreeMap<String, String>,
    pub documents: BTreeMap<String, String>,
    pub status: DigitalIdStatus,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub audit_trail: Vec<AuditEntry>,
}

/// What a cleanup pass removed.
///
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CleanupStats {
    pub users: usize,
    pub locations: usize,
    pub notifications: usize,
}
