use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeskError;

/// The five states a complaint moves through.
///
/// `Closed` is terminal: once a complaint is closed nothing about it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    InProgress,
    Resolved,
    Rejected,
    Closed,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Pending,
        Status::InProgress,
        Status::Resolved,
        Status::Rejected,
        Status::Closed,
    ];

    /// Statuses reachable in a single step from `self`.
    pub fn allowed_targets(self) -> &'static [Status] {
        match self {
            Status::Pending => &[Status::InProgress, Status::Rejected],
            Status::InProgress => &[Status::Resolved, Status::Rejected, Status::Pending],
            Status::Resolved => &[Status::Closed, Status::InProgress],
            Status::Rejected => &[Status::Pending, Status::InProgress],
            Status::Closed => &[],
        }
    }

    /// Pure lookup against the transition table.
    pub fn can_transition(self, to: Status) -> bool {
        self.allowed_targets().contains(&to)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_targets().is_empty()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in_progress",
            Status::Resolved => "resolved",
            Status::Rejected => "rejected",
            Status::Closed => "closed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Status {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| DeskError::Validation(format!("unknown status `{s}`")))
    }
}

/// How urgently a complaint should be handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_lifecycle() {
        use Status::*;
        let expected: [(Status, &[Status]); 5] = [
            (Pending, &[InProgress, Rejected]),
            (InProgress, &[Resolved, Rejected, Pending]),
            (Resolved, &[Closed, InProgress]),
            (Rejected, &[Pending, InProgress]),
            (Closed, &[]),
        ];
        for (from, targets) in expected {
            for to in Status::ALL {
                assert_eq!(
                    from.can_transition(to),
                    targets.contains(&to),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn closed_is_the_only_sink() {
        for status in Status::ALL {
            assert_eq!(status.is_terminal(), status == Status::Closed);
        }
    }

    #[test]
    fn self_transitions_are_never_allowed() {
        for status in Status::ALL {
            assert!(!status.can_transition(status));
        }
    }

    #[test]
    fn parse_accepts_canonical_names_only() {
        assert_eq!("in_progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("In-Progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!(" closed ".parse::<Status>().unwrap(), Status::Closed);
        assert!("in_review".parse::<Status>().is_err());
        assert!("completed".parse::<Status>().is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let priority: Priority = serde_json::from_str("\"urgent\"").unwrap();
        assert_eq!(priority, Priority::Urgent);
    }

    #[test]
    fn display_honours_width() {
        assert_eq!(format!("{:<11}|", Status::Pending), "pending    |");
        assert_eq!(format!("{:<6}|", Priority::Low), "low   |");
        assert_eq!(format!("{:>8}", Priority::Urgent), "  urgent");
    }
}
