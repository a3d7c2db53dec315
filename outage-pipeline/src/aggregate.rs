//! Runs fetch → join → flatten for every configured company, in order.
use outage_social::twitter::encoded_query;

use crate::error::Result;
use crate::fetch::Fetcher;
use crate::flatten::flatten_annotations;
use crate::normalize::join_page;
use crate::table::{AnnotationRow, JoinedRow};

/// Companies searched with the same keyword filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyGroup {
    pub name: String,
    pub filter: String,
    pub handles: Vec<String>,
}

impl CompanyGroup {
    pub fn new(name: impl Into<String>, filter: impl Into<String>, handles: &[&str]) -> Self {
        Self {
            name: name.into(),
            filter: filter.into(),
            handles: handles.iter().map(|h| h.to_string()).collect(),
        }
    }
}

/// Reaction to one company's fetch or decode failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log it, record it in [`Collected::failures`], continue with the next company.
    #[default]
    Skip,
    /// Return the error and discard everything collected so far.
    Abort,
}

#[derive(Debug)]
pub struct CompanyFailure {
    pub handle: String,
    pub error: crate::PipelineError,
}

/// Accumulated rows across all companies, in collection order.
#[derive(Debug, Default)]
pub struct Collected {
    pub joined: Vec<JoinedRow>,
    pub annotations: Vec<AnnotationRow>,
    pub companies_fetched: usize,
    pub companies_empty: usize,
    pub failures: Vec<CompanyFailure>,
}

pub struct Aggregator {
    fetcher: Fetcher,
    policy: FailurePolicy,
}

impl Aggregator {
    pub fn new(fetcher: Fetcher, policy: FailurePolicy) -> Self {
        Self { fetcher, policy }
    }

    /// Joined and annotation rows for one handle, `None` when the search
    /// matched nothing.
    async fn collect_company(
        &self,
        group: &CompanyGroup,
        handle: &str,
    ) -> Result<Option<(Vec<JoinedRow>, Vec<AnnotationRow>)>> {
        let query = encoded_query(handle, &group.filter);
        let page = self.fetcher.fetch(&query).await?;

        if page.result_count() == 0 {
            tracing::info!(group = %group.name, handle, "aggregate.no_results");
            return Ok(None);
        }

        let joined = join_page(&page)?;
        let annotations = flatten_annotations(&joined);
        tracing::info!(
            group = %group.name,
            handle,
            result_count = page.result_count(),
            joined = joined.len(),
            annotations = annotations.len(),
            "aggregate.company_done"
        );
        Ok(Some((joined, annotations)))
    }

    pub async fn run(&self, groups: &[CompanyGroup]) -> Result<Collected> {
        let mut collected = Collected::default();

        for group in groups {
            for handle in &group.handles {
                match self.collect_company(group, handle).await {
                    Ok(Some((joined, annotations))) => {
                        collected.companies_fetched += 1;
                        collected.joined.extend(joined);
                        collected.annotations.extend(annotations);
                    }
                    Ok(None) => {
                        collected.companies_fetched += 1;
                        collected.companies_empty += 1;
                    }
                    Err(error) if self.policy == FailurePolicy::Skip => {
                        tracing::warn!(group = %group.name, handle = %handle, error = %error, "aggregate.company_failed");
                        collected.failures.push(CompanyFailure {
                            handle: handle.clone(),
                            error,
                        });
                    }
                    Err(error) => {
                        tracing::error!(group = %group.name, handle = %handle, error = %error, "aggregate.aborted");
                        return Err(error);
                    }
                }
            }
        }

        Ok(collected)
    }
}
