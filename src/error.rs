use thiserror::Error;

use crate::access::UserId;
use crate::lifecycle::{ComplaintId, Status};

#[derive(Debug, Error)]
pub enum DeskError {
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: Status, to: Status },

    #[error("User {actor} may not {action}")]
    Forbidden { actor: UserId, action: String },

    #[error("Complaint not found: {0}")]
    NotFound(ComplaintId),

    #[error("Complaint {0} was modified concurrently, reload and retry")]
    Conflict(ComplaintId),

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Complaint {0} is closed and can no longer be changed")]
    Immutable(ComplaintId),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl DeskError {
    /// Only lost races are worth retrying; everything else fails the same way twice.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DeskError::Conflict(_))
    }
}

/// Errors surfaced by a [`ComplaintStore`](crate::store::ComplaintStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("complaint {0} does not exist")]
    NotFound(ComplaintId),

    #[error("complaint {0} already exists")]
    Duplicate(ComplaintId),

    #[error("complaint {0} changed since the transaction began")]
    Conflict(ComplaintId),

    #[error("storage backend failed: {0}")]
    Backend(String),
}

impl From<StoreError> for DeskError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => DeskError::NotFound(id),
            StoreError::Conflict(id) => DeskError::Conflict(id),
            StoreError::Duplicate(_) | StoreError::Backend(_) => {
                DeskError::Persistence(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_desk_kinds() {
        let id = ComplaintId::new();
        assert!(matches!(
            DeskError::from(StoreError::NotFound(id)),
            DeskError::NotFound(got) if got == id
        ));
        assert!(matches!(
            DeskError::from(StoreError::Conflict(id)),
            DeskError::Conflict(_)
        ));
        let err = DeskError::from(StoreError::Backend("disk full".into()));
        assert_eq!(err.to_string(), "Persistence failure: storage backend failed: disk full");
    }

    #[test]
    fn only_conflicts_are_retryable() {
        let id = ComplaintId::new();
        assert!(DeskError::Conflict(id).is_retryable());
        assert!(!DeskError::NotFound(id).is_retryable());
        assert!(
            !DeskError::InvalidTransition {
                from: Status::Closed,
                to: Status::Pending
            }
            .is_retryable()
        );
    }

    #[test]
    fn invalid_transition_display() {
        let err = DeskError::InvalidTransition {
            from: Status::Resolved,
            to: Status::Pending,
        };
        assert_eq!(err.to_string(), "Invalid transition: resolved -> pending");
    }
}
