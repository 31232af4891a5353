//! Record storage: the generic filterable list and the threaded mail listing
//! built on it.

pub mod list;
pub mod mail;
pub mod request;

pub use list::{ListStore, LoadTicket};
pub use mail::{MailStore, ViewChange};
pub use request::{LoadRequest, Restriction};
