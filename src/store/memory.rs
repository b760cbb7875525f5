use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use fd_lock::RwLock;
use serde::{Deserialize, Serialize};

use super::{ComplaintStore, StoreTransaction};
use crate::access::UserId;
use crate::audit::StatusLogEntry;
use crate::error::{DeskError, StoreError};
use crate::lifecycle::{Complaint, ComplaintId, Status};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    complaints: BTreeMap<ComplaintId, Complaint>,
    log: Vec<StatusLogEntry>,
}

/// In-process store, optionally mirrored to a JSON snapshot file.
///
/// Clones share the same state. A file-backed store may share its snapshot
/// with other handles and other processes: every operation takes an
/// exclusive lock on `<snapshot>.lock` and re-reads the file before looking
/// at anything, and commits merge their staged writes into that fresh copy.
/// The file is replaced through a rename, so readers never see half a write.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Snapshot>>,
    path: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the snapshot at `path`, or start empty if the file is absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DeskError> {
        let path = path.as_ref().to_path_buf();
        let snapshot = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str::<Snapshot>(&contents)?
        } else {
            Snapshot::default()
        };
        tracing::debug!(
            path = %path.display(),
            complaints = snapshot.complaints.len(),
            "opened complaint store"
        );
        Ok(Self {
            inner: Arc::new(Mutex::new(snapshot)),
            path: Some(path),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Snapshot>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("store lock poisoned".into()))
    }

    /// Run `f` against the latest state.
    ///
    /// For a file-backed store the lock file is held exclusively while `f`
    /// runs and the snapshot is reloaded from disk first.
    fn with_state<T>(
        &self,
        f: impl FnOnce(&mut Snapshot) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut state = self.lock()?;
        let Some(path) = &self.path else {
            return f(&mut state);
        };

        let mut lock_file = RwLock::new(open_lock_file(path)?);
        let _held = lock_file.write().map_err(|e| backend(path, e))?;
        *state = read_snapshot(path)?;
        f(&mut state)
    }

    fn persist(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let tmp = sibling(path, ".tmp");
        fs::write(&tmp, json)
            .and_then(|()| fs::rename(&tmp, path))
            .map_err(|e| {
                tracing::error!(path = %path.display(), error = %e, "failed to write snapshot");
                backend(path, e)
            })
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn backend(path: &Path, e: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(format!("{}: {e}", path.display()))
}

fn open_lock_file(path: &Path) -> Result<File, StoreError> {
    let lock_path = sibling(path, ".lock");
    OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(|e| backend(&lock_path, e))
}

fn read_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
    if !path.exists() {
        return Ok(Snapshot::default());
    }
    let contents = fs::read_to_string(path).map_err(|e| backend(path, e))?;
    serde_json::from_str(&contents).map_err(|e| backend(path, e))
}

impl ComplaintStore for MemoryStore {
    type Tx = MemoryTransaction;

    fn insert(&self, complaint: Complaint) -> Result<(), StoreError> {
        self.with_state(|state| {
            let id = complaint.id;
            if state.complaints.contains_key(&id) {
                return Err(StoreError::Duplicate(id));
            }
            state.complaints.insert(id, complaint);
            if let Err(e) = self.persist(state) {
                state.complaints.remove(&id);
                return Err(e);
            }
            Ok(())
        })
    }

    fn get(&self, id: ComplaintId) -> Result<Complaint, StoreError> {
        self.with_state(|state| {
            state
                .complaints
                .get(&id)
                .cloned()
                .ok_or(StoreError::NotFound(id))
        })
    }

    fn list(&self) -> Result<Vec<Complaint>, StoreError> {
        let mut all: Vec<Complaint> =
            self.with_state(|state| Ok(state.complaints.values().cloned().collect()))?;
        all.sort_by_key(|c| c.created_at);
        Ok(all)
    }

    fn history(&self, id: ComplaintId) -> Result<Vec<StatusLogEntry>, StoreError> {
        self.with_state(|state| {
            if !state.complaints.contains_key(&id) {
                return Err(StoreError::NotFound(id));
            }
            Ok(state
                .log
                .iter()
                .filter(|entry| entry.complaint_id == id)
                .cloned()
                .collect())
        })
    }

    fn begin(&self, id: ComplaintId) -> Result<MemoryTransaction, StoreError> {
        let working = self.get(id)?;
        Ok(MemoryTransaction {
            store: self.clone(),
            base_version: working.version,
            working,
            staged_log: Vec::new(),
            dirty: false,
        })
    }
}

/// Staged writes against one complaint in a [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryTransaction {
    store: MemoryStore,
    base_version: u64,
    working: Complaint,
    staged_log: Vec<StatusLogEntry>,
    dirty: bool,
}

impl StoreTransaction for MemoryTransaction {
    fn complaint(&self) -> &Complaint {
        &self.working
    }

    fn save_status(
        &mut self,
        status: Status,
        resolved_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError> {
        self.working.status = status;
        self.working.resolved_at = resolved_at;
        self.dirty = true;
        Ok(())
    }

    fn save_assignee(&mut self, assignee: Option<UserId>) -> Result<(), StoreError> {
        self.working.assignee = assignee;
        self.dirty = true;
        Ok(())
    }

    fn append_log(&mut self, entry: StatusLogEntry) -> Result<(), StoreError> {
        if entry.complaint_id != self.working.id {
            return Err(StoreError::Backend(format!(
                "log entry for {} staged in transaction for {}",
                entry.complaint_id, self.working.id
            )));
        }
        self.staged_log.push(entry);
        self.dirty = true;
        Ok(())
    }

    fn commit(self) -> Result<Complaint, StoreError> {
        let MemoryTransaction {
            store,
            base_version,
            mut working,
            staged_log,
            dirty,
        } = self;
        if !dirty {
            return Ok(working);
        }

        let id = working.id;
        store.with_state(|state| {
            let current = state
                .complaints
                .get(&id)
                .ok_or(StoreError::NotFound(id))?;
            if current.version != base_version {
                return Err(StoreError::Conflict(id));
            }

            working.version = base_version + 1;
            working.updated_at = Utc::now();
            let previous = state.complaints.insert(id, working.clone());
            let log_len = state.log.len();
            state.log.extend(staged_log);

            if let Err(e) = store.persist(state) {
                state.log.truncate(log_len);
                if let Some(previous) = previous {
                    state.complaints.insert(id, previous);
                }
                return Err(e);
            }
            Ok(working)
        })
    }
}
