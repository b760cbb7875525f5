use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::{Priority, Status};
use crate::access::UserId;
use crate::error::DeskError;

const MAX_TITLE_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplaintId(pub Uuid);

impl ComplaintId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ComplaintId {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| DeskError::Validation(format!("invalid complaint id `{s}`: {e}")))
    }
}

/// Fields supplied by whoever files a complaint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewComplaint {
    pub title: String,
    pub body: String,
    pub category: String,
    pub department: String,
    #[serde(default)]
    pub priority: Priority,
}

/// A grievance tracked through its status lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: ComplaintId,
    pub title: String,
    pub body: String,
    pub category: String,
    pub department: String,
    pub submitter: UserId,
    pub assignee: Option<UserId>,
    pub status: Status,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    /// Bumped on every committed write; stale transactions are refused.
    pub version: u64,
}

impl Complaint {
    /// Validate the submission and build a fresh `pending` complaint.
    pub fn new(input: NewComplaint, submitter: UserId) -> Result<Self, DeskError> {
        let title = input.title.trim();
        let body = input.body.trim();
        if title.is_empty() {
            return Err(DeskError::Validation("title must not be empty".into()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(DeskError::Validation(format!(
                "title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        if body.is_empty() {
            return Err(DeskError::Validation("body must not be empty".into()));
        }

        let now = Utc::now();
        Ok(Self {
            id: ComplaintId::new(),
            title: title.to_string(),
            body: body.to_string(),
            category: slug(&input.category),
            department: slug(&input.department),
            submitter,
            assignee: None,
            status: Status::Pending,
            priority: input.priority,
            created_at: now,
            updated_at: now,
            resolved_at: None,
            version: 0,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.status.is_terminal()
    }

    /// The `resolved_at` value that goes with moving this complaint to `to`.
    ///
    /// Entering `resolved` stamps `at`; reopening clears the stamp; any other
    /// move keeps whatever was there.
    pub fn resolved_at_after(&self, to: Status, at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match to {
            Status::Resolved => Some(at),
            Status::Pending | Status::InProgress => None,
            Status::Rejected | Status::Closed => self.resolved_at,
        }
    }
}

fn slug(s: &str) -> String {
    let s = s.trim();
    if s.is_empty() {
        "general".to_string()
    } else {
        s.to_lowercase().replace(char::is_whitespace, "-")
    }
}
