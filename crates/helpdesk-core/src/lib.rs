pub mod attachment;
pub mod category;
pub mod ticket;
pub mod user;

pub use attachment::{AttachmentError, AttachmentUpload, MAX_ATTACHMENT_BYTES};
pub use category::{Category, ParseCategoryError};
pub use ticket::{Caller, Comment, Priority, Role, Ticket, TicketId, TicketStatus, UserRef};
pub use user::{AdminSummary, UserAccount};
