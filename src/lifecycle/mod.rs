mod complaint;
mod status;

pub use complaint::{Complaint, ComplaintId, NewComplaint};
pub use status::{Priority, Status};
