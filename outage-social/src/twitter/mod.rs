//! Twitter/X recent-search surface consumed by the batch pipeline.
//!
//! Submodules provide query construction, the HTTP client wrapper, and the
//! strongly typed response models.
pub mod client;
pub mod query;
pub mod types;

pub use client::{RecentSearch, SearchParams, TwitterApi};
pub use query::{build_query, encode_query, encoded_query};
