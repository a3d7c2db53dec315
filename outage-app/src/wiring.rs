//! Translates the loaded configuration into a ready-to-run [`Batch`].
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use outage_config::{FetchErrorPolicy, OutageConfig};
use outage_pipeline::postprocess::parse_timezone;
use outage_pipeline::{Batch, BatchOptions, CompanyGroup, FailurePolicy};
use outage_social::twitter::{SearchParams, TwitterApi};

pub fn company_groups(cfg: &OutageConfig) -> Vec<CompanyGroup> {
    cfg.groups
        .iter()
        .map(|g| CompanyGroup {
            name: g.name.clone(),
            filter: g.filter.clone(),
            handles: g.handles.clone(),
        })
        .collect()
}

pub fn batch_options(cfg: &OutageConfig) -> Result<BatchOptions> {
    let output = &cfg.output;
    Ok(BatchOptions {
        output_dir: output.directory.clone(),
        audit_dir: output
            .write_audit
            .then(|| output.directory.join(&output.audit_dir)),
        timezone: parse_timezone(&output.timezone)?,
        on_fetch_error: match cfg.pipeline.on_fetch_error {
            FetchErrorPolicy::Skip => FailurePolicy::Skip,
            FetchErrorPolicy::Abort => FailurePolicy::Abort,
        },
        prune_orphan_annotations: cfg.pipeline.prune_orphan_annotations,
        ..BatchOptions::default()
    })
}

pub fn build_batch(cfg: &OutageConfig) -> Result<Batch> {
    let token = cfg.bearer_token()?;
    let api = TwitterApi::with_base_url(&cfg.twitter.api_base, token.to_string())
        .with_context(|| format!("invalid twitter.api_base {:?}", cfg.twitter.api_base))?
        .with_timeout(Duration::from_secs(cfg.twitter.timeout_secs))
        .with_params(SearchParams {
            max_results: cfg.twitter.max_results,
            ..SearchParams::default()
        });

    Ok(Batch::new(Arc::new(api), batch_options(cfg)?))
}
