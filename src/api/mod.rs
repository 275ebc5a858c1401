//! REST API client module for the Atelier platform.
//!
//! This module provides the `ApiClient` for communicating with the
//! platform API: publications, users, comments, and notifications.
//!
//! The API uses JWT bearer token authentication. An expired token is
//! recovered transparently: the first 401 on a request triggers exactly one
//! cookie-authenticated silent refresh and one resend (see `client`).

pub mod client;
pub mod comments;
pub mod error;
pub mod notifications;
pub mod publications;
pub mod users;

pub use client::{ApiClient, AuthResponse, ImageUpload};
pub use error::ApiError;
