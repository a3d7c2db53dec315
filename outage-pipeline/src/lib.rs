//! Recent-search batch for utility and internet-provider outage complaints.
//!
//! For each company handle the pipeline builds a `to:<handle> (<filter>)` query,
//! fetches one page of recent tweets, joins tweets with their authors, and
//! splits the nested entity annotations into their own table. Once every
//! company is collected the tweet table is deduplicated, timestamps are moved
//! to local time, and both tables are written to a two-sheet workbook.
//!
//! Stages, in order: [`fetch`] → [`normalize`] → [`flatten`] → [`aggregate`] →
//! [`postprocess`] → [`export`], driven by [`batch::Batch`].
pub mod aggregate;
pub mod batch;
pub mod error;
pub mod export;
pub mod fetch;
pub mod flatten;
pub mod normalize;
pub mod postprocess;
pub mod table;

pub use aggregate::{CompanyGroup, FailurePolicy};
pub use batch::{Batch, BatchOptions, BatchReport};
pub use error::{PipelineError, Result};
