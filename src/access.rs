//! Who is acting, and what they may do to a complaint.
//!
//! A user's institutional [`Role`] says little on its own; what matters for a
//! given complaint is the [`Capacity`] they act in, which also depends on
//! whether they filed it or were assigned to it. Authorization decisions are
//! made by an [`Authorizer`], with [`RolePolicy`] as the stock rule set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DeskError;
use crate::lifecycle::{Complaint, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| DeskError::Validation(format!("invalid user id `{s}`: {e}")))
    }
}

/// Institutional role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Staff,
    Parent,
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Staff => write!(f, "staff"),
            Role::Parent => write!(f, "parent"),
            Role::Student => write!(f, "student"),
        }
    }
}

/// The user performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

/// The capacity an actor holds with respect to one complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Admin,
    Assignee,
    Submitter,
    Staff,
    Unrelated,
}

impl Capacity {
    /// Strongest tie wins: admin, then assignee, submitter, staff.
    pub fn of(actor: &Actor, complaint: &Complaint) -> Self {
        if actor.role == Role::Admin {
            Capacity::Admin
        } else if complaint.assignee == Some(actor.id) {
            Capacity::Assignee
        } else if complaint.submitter == actor.id {
            Capacity::Submitter
        } else if actor.role == Role::Staff {
            Capacity::Staff
        } else {
            Capacity::Unrelated
        }
    }
}

/// Decides whether `actor` may move `complaint` to `target`.
pub trait Authorizer {
    fn is_authorized(&self, actor: &Actor, complaint: &Complaint, target: Status) -> bool;

    /// Whether `actor` may change who handles `complaint`. Admins only by default.
    fn may_assign(&self, actor: &Actor, complaint: &Complaint) -> bool {
        Capacity::of(actor, complaint) == Capacity::Admin
    }
}

/// Default rules: admins always, assignees on their own complaints, and
/// optionally any staff member for triage out of `pending`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolePolicy {
    pub staff_may_triage: bool,
}

impl RolePolicy {
    pub fn new(staff_may_triage: bool) -> Self {
        Self { staff_may_triage }
    }
}

impl Authorizer for RolePolicy {
    fn is_authorized(&self, actor: &Actor, complaint: &Complaint, _target: Status) -> bool {
        match Capacity::of(actor, complaint) {
            Capacity::Admin | Capacity::Assignee => true,
            Capacity::Staff => self.staff_may_triage && complaint.status == Status::Pending,
            Capacity::Submitter | Capacity::Unrelated => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::NewComplaint;

    fn complaint_by(submitter: UserId) -> Complaint {
        Complaint::new(
            NewComplaint {
                title: "Bus late".into(),
                body: "Route 7 was 40 minutes late".into(),
                ..Default::default()
            },
            submitter,
        )
        .unwrap()
    }

    #[test]
    fn capacity_precedence() {
        let parent = Actor::new(UserId::new(), Role::Parent);
        let staff = Actor::new(UserId::new(), Role::Staff);
        let admin = Actor::new(UserId::new(), Role::Admin);
        let stranger = Actor::new(UserId::new(), Role::Student);

        let mut c = complaint_by(parent.id);
        assert_eq!(Capacity::of(&parent, &c), Capacity::Submitter);
        assert_eq!(Capacity::of(&staff, &c), Capacity::Staff);
        assert_eq!(Capacity::of(&admin, &c), Capacity::Admin);
        assert_eq!(Capacity::of(&stranger, &c), Capacity::Unrelated);

        c.assignee = Some(staff.id);
        assert_eq!(Capacity::of(&staff, &c), Capacity::Assignee);

        // A staff member who filed and was assigned their own complaint acts as assignee.
        let mut own = complaint_by(staff.id);
        own.assignee = Some(staff.id);
        assert_eq!(Capacity::of(&staff, &own), Capacity::Assignee);
    }

    #[test]
    fn role_policy_rules() {
        let policy = RolePolicy::default();
        let parent = Actor::new(UserId::new(), Role::Parent);
        let assignee = Actor::new(UserId::new(), Role::Staff);
        let other_staff = Actor::new(UserId::new(), Role::Staff);
        let admin = Actor::new(UserId::new(), Role::Admin);

        let mut c = complaint_by(parent.id);
        c.assignee = Some(assignee.id);

        assert!(policy.is_authorized(&admin, &c, Status::InProgress));
        assert!(policy.is_authorized(&assignee, &c, Status::InProgress));
        assert!(!policy.is_authorized(&other_staff, &c, Status::InProgress));
        assert!(!policy.is_authorized(&parent, &c, Status::Rejected));
    }

    #[test]
    fn staff_triage_only_from_pending() {
        let policy = RolePolicy::new(true);
        let staff = Actor::new(UserId::new(), Role::Staff);
        let mut c = complaint_by(UserId::new());

        assert!(policy.is_authorized(&staff, &c, Status::InProgress));
        c.status = Status::InProgress;
        assert!(!policy.is_authorized(&staff, &c, Status::Resolved));
    }

    #[test]
    fn only_admins_assign() {
        let policy = RolePolicy::default();
        let staff = Actor::new(UserId::new(), Role::Staff);
        let mut c = complaint_by(UserId::new());
        c.assignee = Some(staff.id);
        assert!(policy.may_assign(&Actor::new(UserId::new(), Role::Admin), &c));
        assert!(!policy.may_assign(&staff, &c));
    }
}
