//! Notification records and their mapping onto a push-messaging payload.
//!
//! A `Notification` is queued for every alert; dispatching it means turning it into a
//! `PushPayload` for the user's device and recording the outcome on the notification itself.
//! The transport behind `PushMessenger` is not ours.
//!

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use tourguard_geofence::{Alert, Severity};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    High,
    Normal,
}

impl From<Severity> for Priority {
    fn from(value: Severity) -> Self {
        match value {
            Severity::High => Priority::High,
            Severity::Medium | Severity::Low => Priority::Normal,
        }
    }
}

/// Delivery state, written back after every dispatch attempt.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum NotificationStatus {
    Pending,
    Sent {
        #[serde(rename = "messageId")]
        message_id: String,
        #[serde(rename = "sentAt")]
        at: DateTime<Utc>,
    },
    Failed {
        error: String,
        #[serde(rename = "failedAt")]
        at: DateTime<Utc>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    /// Type tag, e.g. `geo_fence_alert`, selects the delivery channel.
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub status: NotificationStatus,
}

impl Notification {
    /// Build the pending notification announcing `alert` to `user_id`.
    ///
    pub fn from_alert(user_id: &str, alert: &Alert) -> Self {
        // Coordinate serialization can not fail
        let location = serde_json::to_string(&alert.location).unwrap_or_default();

        let data = BTreeMap::from([
            ("alertType".to_string(), alert.kind.to_string()),
            ("severity".to_string(), alert.severity.to_string()),
            ("location".to_string(), location),
        ]);

        Notification {
            id: uuid::Uuid::now_v7().to_string(),
            user_id: user_id.to_string(),
            kind: alert.kind.to_string(),
            title: alert.title.clone(),
            body: alert.message.clone(),
            data,
            priority: alert.severity.into(),
            created_at: alert.created_at,
            status: NotificationStatus::Pending,
        }
    }
}

/// Delivery channel for a notification type.
///
pub fn channel_id(kind: &str) -> &'static str {
    match kind {
        "emergency_alert" | "panic_response" => "emergency_alerts",
        "geo_fence_alert" => "geo_fence_alerts",
        "trip_update" => "trip_updates",
        _ => "general_notifications",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PushContent {
    pub title: String,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidNotification {
    pub channel_id: String,
    /// `high` or `default`
    pub priority: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AndroidConfig {
    /// `high` or `normal`
    pub priority: String,
    pub notification: AndroidNotification,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Aps {
    pub alert: PushContent,
    pub badge: u32,
    pub sound: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApnsPayload {
    pub aps: Aps,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApnsConfig {
    pub payload: ApnsPayload,
}

/// Platform-neutral push message, ready for whatever messaging service sits behind
/// `PushMessenger`.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PushPayload {
    pub token: String,
    pub notification: PushContent,
    pub data: BTreeMap<String, String>,
    pub android: AndroidConfig,
    pub apns: ApnsConfig,
}

impl PushPayload {
    #[tracing::instrument(skip(token))]
    pub fn build(token: &str, n: &Notification) -> Self {
        let content = PushContent {
            title: n.title.clone(),
            body: n.body.clone(),
        };
        let (priority, display) = match n.priority {
            Priority::High => ("high", "high"),
            Priority::Normal => ("normal", "default"),
        };

        PushPayload {
            token: token.to_string(),
            notification: content.clone(),
            data: n.data.clone(),
            android: AndroidConfig {
                priority: priority.to_string(),
                notification: AndroidNotification {
                    channel_id: channel_id(&n.kind).to_string(),
                    priority: display.to_string(),
                },
            },
            apns: ApnsConfig {
                payload: ApnsPayload {
                    aps: Aps {
                        alert: content,
                        badge: 1,
                        sound: "default".to_string(),
                    },
                },
            },
        }
    }
}
