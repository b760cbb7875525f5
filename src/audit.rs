use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::UserId;
use crate::lifecycle::{ComplaintId, Status};

/// One accepted status change. Entries are appended, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusLogEntry {
    pub id: Uuid,
    pub complaint_id: ComplaintId,
    pub from: Status,
    pub to: Status,
    pub actor: UserId,
    pub note: Option<String>,
    pub at: DateTime<Utc>,
}

impl StatusLogEntry {
    pub fn record(
        complaint_id: ComplaintId,
        from: Status,
        to: Status,
        actor: UserId,
        note: Option<&str>,
        at: DateTime<Utc>,
    ) -> Self {
        let note = note
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Self {
            id: Uuid::new_v4(),
            complaint_id,
            from,
            to,
            actor,
            note,
            at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_notes_are_dropped() {
        let entry = StatusLogEntry::record(
            ComplaintId::new(),
            Status::Pending,
            Status::InProgress,
            UserId::new(),
            Some("   "),
            Utc::now(),
        );
        assert!(entry.note.is_none());
    }

    #[test]
    fn notes_are_trimmed() {
        let entry = StatusLogEntry::record(
            ComplaintId::new(),
            Status::InProgress,
            Status::Resolved,
            UserId::new(),
            Some("  replaced the heater\n"),
            Utc::now(),
        );
        assert_eq!(entry.note.as_deref(), Some("replaced the heater"));
        assert_eq!((entry.from, entry.to), (Status::InProgress, Status::Resolved));
    }
}
