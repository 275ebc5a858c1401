//! Client library for the Atelier art-sharing platform API.
//!
//! This crate is the layer below a UI: authenticated sessions with silent
//! token refresh, the platform's REST endpoints (publications, users,
//! comments, notifications), and a paginated feed controller with
//! replace-on-filter-change semantics.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use atelier_client::api::ApiClient;
//! use atelier_client::auth::{Session, SessionManager};
//! use atelier_client::feed::{FeedController, FeedFilter};
//! use atelier_client::storage::FileStore;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let store = Arc::new(FileStore::open("/tmp/atelier".into())?);
//! let session = Arc::new(Session::new(store));
//! let api = ApiClient::new("https://api.atelier.gallery", session.clone())?;
//!
//! let auth = SessionManager::new(api.clone(), session);
//! auth.login("ines", "secret").await?;
//!
//! let feed = FeedController::new(api, FeedFilter::default());
//! feed.refresh().await?;
//! for post in feed.snapshot().items {
//!     println!("{}", post.description.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod feed;
pub mod models;
pub mod storage;

pub use api::{ApiClient, ApiError, ImageUpload};
pub use auth::{Session, SessionManager, SessionUser, SessionUserPatch};
pub use config::Config;
pub use feed::{FeedController, FeedFilter, FeedRoute, FeedSnapshot};
pub use storage::{FileStore, MemoryStore, StorageBackend};
