//! Notification delivery.
//!

use chrono::{DateTime, Utc};
use tracing::{error, info, trace, warn};

use crate::{Engine, EngineError, NotificationStatus, PushPayload};

impl Engine {
    /// Push notification `id` to its user's device and record the outcome.
    ///
    /// A user without a push token is not an error, the notification just stays pending.  An
    /// unknown user makes the delivery fail.
    ///
    #[tracing::instrument(skip(self))]
    pub async fn dispatch(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<NotificationStatus, EngineError> {
        trace!("enter");

        let notification = self.svc.notifications.get_notification(id).await?;

        let status = match self.svc.users.profile(&notification.user_id).await {
            Ok(profile) => {
                let Some(token) = profile.push_token else {
                    warn!("No FCM token for user {}", notification.user_id);
                    return Ok(notification.status);
                };
                self.deliver(id, &PushPayload::build(&token, &notification), now)
                    .await
            }
            Err(e) => {
                error!("Error sending notification {id}: {e}");
                NotificationStatus::Failed {
                    error: e.to_string(),
                    at: now,
                }
            }
        };

        self.svc
            .notifications
            .update_status(id, status.clone())
            .await?;
        Ok(status)
    }

    async fn deliver(
        &self,
        id: &str,
        payload: &PushPayload,
        now: DateTime<Utc>,
    ) -> NotificationStatus {
        match self.svc.push.send(payload).await {
            Ok(message_id) => {
                info!("notification {id} sent as {message_id}");
                NotificationStatus::Sent {
                    message_id,
                    at: now,
                }
            }
            Err(e) => {
                error!("Error sending notification {id}: {e}");
                NotificationStatus::Failed {
                    error: e.to_string(),
                    at: now,
                }
            }
        }
    }

    /// Dispatch every pending notification, oldest first.  Returns how many got sent.
    ///
    /// A notification that can not be dispatched is logged and skipped.
    ///
    #[tracing::instrument(skip(self))]
    pub async fn dispatch_pending(&self, now: DateTime<Utc>) -> Result<usize, EngineError> {
        let pending = self.svc.notifications.pending().await?;
        trace!("{} pending", pending.len());

        let mut sent = 0;
        for n in pending {
            match self.dispatch(&n.id, now).await {
                Ok(NotificationStatus::Sent { .. }) => sent += 1,
                Ok(_) => (),
                Err(e) => error!("notification {} not dispatched: {e}", n.id),
            }
        }
        Ok(sent)
    }
}
