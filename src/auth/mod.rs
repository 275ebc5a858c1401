//! Authentication module for managing user sessions.
//!
//! This module provides:
//! - `Session`: persistent token + user-snapshot state over a key-value store
//! - `SessionManager`: login, registration, logout, and snapshot updates
//!
//! The token is the sole authority on "logged in"; every identity read
//! collapses to absent while no token is stored.

pub mod manager;
pub mod session;

pub use manager::SessionManager;
pub use session::{Session, SessionUser, SessionUserPatch};
