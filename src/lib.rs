//! Complaint lifecycle engine.
//!
//! Complaints move through a fixed status table (see [`lifecycle::Status`]).
//! [`desk::ComplaintDesk`] guards every move: the edge must exist, the actor
//! must be allowed to take it, and the new status is committed together with
//! exactly one [`audit::StatusLogEntry`] or not at all.

pub mod access;
pub mod audit;
pub mod cli;
pub mod config;
pub mod desk;
pub mod error;
pub mod lifecycle;
pub mod notify;
pub mod store;
pub mod ui;

pub use access::{Actor, Authorizer, Capacity, Role, RolePolicy, UserId};
pub use audit::StatusLogEntry;
pub use desk::{ComplaintDesk, Transition};
pub use error::{DeskError, StoreError};
pub use lifecycle::{Complaint, ComplaintId, NewComplaint, Priority, Status};
