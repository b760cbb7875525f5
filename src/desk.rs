use std::time::Duration;

use chrono::Utc;
use tokio::time::sleep;

use crate::access::{Actor, Authorizer, UserId};
use crate::audit::StatusLogEntry;
use crate::config::RetryConfig;
use crate::error::DeskError;
use crate::lifecycle::{Complaint, ComplaintId, NewComplaint, Status};
use crate::notify::{Notifier, StatusChanged};
use crate::store::{ComplaintStore, StoreTransaction};

/// An accepted status change: the committed complaint and its log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub complaint: Complaint,
    pub entry: StatusLogEntry,
}

/// Files, assigns and moves complaints through their lifecycle.
///
/// Every mutating call runs inside a single store transaction. All checks
/// happen before anything is staged, so a rejected call leaves no trace.
pub struct ComplaintDesk<S, A, N> {
    store: S,
    authorizer: A,
    notifier: N,
    retry: RetryConfig,
}

impl<S, A, N> ComplaintDesk<S, A, N>
where
    S: ComplaintStore,
    A: Authorizer,
    N: Notifier,
{
    pub fn new(store: S, authorizer: A, notifier: N) -> Self {
        Self {
            store,
            authorizer,
            notifier,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a new complaint on behalf of `actor`, who becomes its submitter.
    pub fn file(&self, actor: &Actor, input: NewComplaint) -> Result<Complaint, DeskError> {
        let complaint = Complaint::new(input, actor.id)?;
        self.store.insert(complaint.clone())?;
        tracing::info!(
            complaint = %complaint.id,
            submitter = %actor.id,
            category = %complaint.category,
            priority = %complaint.priority,
            "complaint filed"
        );
        Ok(complaint)
    }

    /// Hand `id` to `assignee`. Closed complaints cannot be reassigned.
    pub fn assign(
        &self,
        id: ComplaintId,
        assignee: UserId,
        actor: &Actor,
    ) -> Result<Complaint, DeskError> {
        let mut tx = self.store.begin(id)?;
        if !self.authorizer.may_assign(actor, tx.complaint()) {
            return Err(DeskError::Forbidden {
                actor: actor.id,
                action: format!("assign complaint {id}"),
            });
        }
        if tx.complaint().is_closed() {
            return Err(DeskError::Immutable(id));
        }

        tx.save_assignee(Some(assignee))?;
        let complaint = tx.commit()?;
        tracing::info!(complaint = %id, assignee = %assignee, by = %actor.id, "complaint assigned");
        Ok(complaint)
    }

    /// Move complaint `id` to `target`.
    ///
    /// The edge is checked against the transition table first, then the
    /// actor's authorization. On success the new status and one log entry
    /// are committed together and a [`StatusChanged`] event is dispatched.
    pub fn transition(
        &self,
        id: ComplaintId,
        target: Status,
        actor: &Actor,
        note: Option<&str>,
    ) -> Result<Transition, DeskError> {
        let mut tx = self.store.begin(id)?;
        let from = tx.complaint().status;

        if !from.can_transition(target) {
            tracing::debug!(complaint = %id, %from, to = %target, "transition not in table");
            return Err(DeskError::InvalidTransition { from, to: target });
        }
        if !self.authorizer.is_authorized(actor, tx.complaint(), target) {
            tracing::debug!(complaint = %id, actor = %actor.id, role = %actor.role, "transition forbidden");
            return Err(DeskError::Forbidden {
                actor: actor.id,
                action: format!("move complaint {id} from {from} to {target}"),
            });
        }

        let at = Utc::now();
        let resolved_at = tx.complaint().resolved_at_after(target, at);
        tx.save_status(target, resolved_at)?;
        let entry = StatusLogEntry::record(id, from, target, actor.id, note, at);
        tx.append_log(entry.clone())?;

        let complaint = tx.commit().map_err(|e| {
            tracing::warn!(complaint = %id, error = %e, "transition not committed");
            DeskError::from(e)
        })?;

        self.notifier.status_changed(&StatusChanged {
            complaint_id: id,
            title: complaint.title.clone(),
            from,
            to: target,
            actor: actor.id,
            at,
        });

        Ok(Transition { complaint, entry })
    }

    /// [`transition`](Self::transition), retried with exponential backoff
    /// while it keeps losing races to concurrent writers.
    ///
    /// Each retry reloads the complaint, so a retry can still end in
    /// `InvalidTransition` if the competing write already moved it.
    pub async fn transition_with_retry(
        &self,
        id: ComplaintId,
        target: Status,
        actor: &Actor,
        note: Option<&str>,
    ) -> Result<Transition, DeskError> {
        let mut attempt = 0;
        loop {
            match self.transition(id, target, actor, note) {
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay_ms = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        complaint = %id,
                        attempt,
                        max = self.retry.max_retries,
                        delay_ms,
                        "conflict, retrying transition"
                    );
                    sleep(Duration::from_millis(delay_ms)).await;
                }
                other => return other,
            }
        }
    }

    pub fn get(&self, id: ComplaintId) -> Result<Complaint, DeskError> {
        Ok(self.store.get(id)?)
    }

    pub fn list(&self, status: Option<Status>) -> Result<Vec<Complaint>, DeskError> {
        let mut all = self.store.list()?;
        if let Some(status) = status {
            all.retain(|c| c.status == status);
        }
        Ok(all)
    }

    pub fn history(&self, id: ComplaintId) -> Result<Vec<StatusLogEntry>, DeskError> {
        Ok(self.store.history(id)?)
    }
}
