//! Paginated feed retrieval.
//!
//! This module provides:
//! - `FeedFilter`: the type/author/tag/follow-scope/sort combination that
//!   selects a backing listing
//! - `FeedController`: incremental page loading with replace-on-filter-change
//!   semantics and discard of superseded responses

pub mod controller;
pub mod filter;

pub use controller::{FeedController, FeedSnapshot};
pub use filter::{FeedFilter, FeedRoute};
