//! Auth records owned by the external auth service.
//!
//! Each user has two identical copies, keyed by id and by username.

pub mod repo;

pub use repo::update_password;
