//! Entity clients.
//!
//! Each client owns a clone of the shared [`crate::executor::Executor`] and
//! the base URL of its service. Operations build a request, hand it to the
//! executor and return either a typed entity or an acknowledgement.

pub mod bootstrap;
pub mod certs;
pub mod channels;
pub mod domains;
pub mod groups;
pub mod messages;
pub mod roles;
pub mod things;
pub mod users;

pub use bootstrap::Bootstrap;
pub use certs::Certs;
pub use channels::Channels;
pub use domains::Domains;
pub use groups::Groups;
pub use messages::Messages;
pub use roles::Roles;
pub use things::Things;
pub use users::Users;
