//! Fire-and-forget status change notifications.
//!
//! Notifiers run after a transition has committed. They return nothing, so a
//! delivery problem can never undo the transition that triggered it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::access::UserId;
use crate::lifecycle::{ComplaintId, Status};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChanged {
    pub complaint_id: ComplaintId,
    pub title: String,
    pub from: Status,
    pub to: Status,
    pub actor: UserId,
    pub at: DateTime<Utc>,
}

pub trait Notifier {
    fn status_changed(&self, event: &StatusChanged);
}

/// Emits one structured log line per status change.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn status_changed(&self, event: &StatusChanged) {
        tracing::info!(
            complaint = %event.complaint_id,
            from = %event.from,
            to = %event.to,
            actor = %event.actor,
            "status changed"
        );
    }
}

/// Hands events to an async consumer over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: UnboundedSender<StatusChanged>,
}

impl ChannelNotifier {
    pub fn new(tx: UnboundedSender<StatusChanged>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn status_changed(&self, event: &StatusChanged) {
        if self.tx.send(event.clone()).is_err() {
            tracing::warn!(
                complaint = %event.complaint_id,
                "notification receiver closed, dropping status change"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn event() -> StatusChanged {
        StatusChanged {
            complaint_id: ComplaintId::new(),
            title: "Noise in library".into(),
            from: Status::Pending,
            to: Status::InProgress,
            actor: UserId::new(),
            at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn channel_notifier_delivers() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let notifier = ChannelNotifier::new(tx);
        let sent = event();
        notifier.status_changed(&sent);
        assert_eq!(rx.recv().await.unwrap(), sent);
    }

    #[test]
    fn closed_receiver_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        ChannelNotifier::new(tx).status_changed(&event());
    }
}
