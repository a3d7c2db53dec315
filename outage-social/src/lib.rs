//! Social network clients used by the outage batch.
//!
//! Only the Twitter/X recent-search endpoint is implemented.
pub mod twitter;
