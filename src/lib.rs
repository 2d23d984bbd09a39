//! User profile service: authenticated read/update of profile records,
//! password changes and preferences, over a pluggable key-value store.

pub mod accounts;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod profiles;
pub mod state;
pub mod storage;
