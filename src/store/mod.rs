//! Persistence seam for complaints and their status log.
//!
//! All mutation goes through a [`StoreTransaction`] obtained from
//! [`ComplaintStore::begin`]. A transaction stages writes against a snapshot
//! of one complaint and applies them together on [`StoreTransaction::commit`];
//! dropping it without committing discards everything it staged.

mod memory;

use chrono::{DateTime, Utc};

use crate::access::UserId;
use crate::audit::StatusLogEntry;
use crate::error::StoreError;
use crate::lifecycle::{Complaint, ComplaintId, Status};

pub use memory::{MemoryStore, MemoryTransaction};

pub trait ComplaintStore {
    type Tx: StoreTransaction;

    fn insert(&self, complaint: Complaint) -> Result<(), StoreError>;

    fn get(&self, id: ComplaintId) -> Result<Complaint, StoreError>;

    /// All complaints, oldest first.
    fn list(&self) -> Result<Vec<Complaint>, StoreError>;

    /// Status log of one complaint in append order.
    fn history(&self, id: ComplaintId) -> Result<Vec<StatusLogEntry>, StoreError>;

    /// Open a transaction scoped to a single complaint.
    fn begin(&self, id: ComplaintId) -> Result<Self::Tx, StoreError>;
}

pub trait StoreTransaction {
    /// The complaint as of `begin`, with any staged writes applied.
    fn complaint(&self) -> &Complaint;

    fn save_status(
        &mut self,
        status: Status,
        resolved_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError>;

    fn save_assignee(&mut self, assignee: Option<UserId>) -> Result<(), StoreError>;

    fn append_log(&mut self, entry: StatusLogEntry) -> Result<(), StoreError>;

    /// Apply every staged write at once, or none of them.
    ///
    /// Fails with [`StoreError::Conflict`] if another transaction committed
    /// against the same complaint after this one began.
    fn commit(self) -> Result<Complaint, StoreError>;
}
