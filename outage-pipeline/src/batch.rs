//! End-to-end run: collect every company, clean, write the workbook.
use std::path::PathBuf;
use std::sync::Arc;

use chrono_tz::Tz;
use outage_social::twitter::RecentSearch;

use crate::aggregate::{Aggregator, CompanyFailure, CompanyGroup, FailurePolicy};
use crate::error::Result;
use crate::export::{workbook_path, write_workbook};
use crate::fetch::{AuditLog, Fetcher};
use crate::postprocess::{PostProcessor, DEFAULT_TIMEZONE};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    /// Where raw pages are kept; `None` disables the audit trail.
    pub audit_dir: Option<PathBuf>,
    pub timezone: Tz,
    pub on_fetch_error: FailurePolicy,
    pub prune_orphan_annotations: bool,
    /// `DDMonYYYY` stamp shared by every file this run writes.
    pub stamp: String,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            audit_dir: Some(PathBuf::from("json_files")),
            timezone: DEFAULT_TIMEZONE,
            on_fetch_error: FailurePolicy::Skip,
            prune_orphan_annotations: false,
            stamp: outage_common::today_stamp(),
        }
    }
}

#[derive(Debug)]
pub struct BatchReport {
    pub workbook: PathBuf,
    pub tweets: usize,
    pub annotations: usize,
    pub companies_fetched: usize,
    pub companies_empty: usize,
    pub failures: Vec<CompanyFailure>,
}

pub struct Batch {
    aggregator: Aggregator,
    post: PostProcessor,
    output_dir: PathBuf,
    stamp: String,
}

impl Batch {
    pub fn new(source: Arc<dyn RecentSearch>, options: BatchOptions) -> Self {
        let mut fetcher = Fetcher::new(source);
        if let Some(dir) = options.audit_dir {
            fetcher = fetcher.with_audit(AuditLog::new(dir, options.stamp.clone()));
        }

        Self {
            aggregator: Aggregator::new(fetcher, options.on_fetch_error),
            post: PostProcessor {
                timezone: options.timezone,
                prune_orphan_annotations: options.prune_orphan_annotations,
            },
            output_dir: options.output_dir,
            stamp: options.stamp,
        }
    }

    pub async fn run(&self, groups: &[CompanyGroup]) -> Result<BatchReport> {
        let companies: usize = groups.iter().map(|g| g.handles.len()).sum();
        tracing::info!(groups = groups.len(), companies, stamp = %self.stamp, "batch.start");

        let collected = self.aggregator.run(groups).await?;
        let tables = self.post.run(collected.joined, collected.annotations);

        let workbook = workbook_path(&self.output_dir, &self.stamp);
        write_workbook(&workbook, &tables.tweets, &tables.annotations)?;

        Ok(BatchReport {
            workbook,
            tweets: tables.tweets.len(),
            annotations: tables.annotations.len(),
            companies_fetched: collected.companies_fetched,
            companies_empty: collected.companies_empty,
            failures: collected.failures,
        })
    }
}
