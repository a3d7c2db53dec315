use anyhow::Result;
use outage_common::observability::{LogConfig, init_logging};
use outage_config::OutageConfigLoader;
use wiring::{build_batch, company_groups};
mod wiring;

const CONFIG_FILE: &str = "outage.yaml";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1) Load config: defaults, then outage.yaml if present, then env
    let cfg = OutageConfigLoader::new()
        .with_optional_file(CONFIG_FILE)
        .load()?;

    let log_path = init_logging(LogConfig::default())?;
    tracing::info!(log = %log_path.display(), "outage-watch starting");

    let batch = build_batch(&cfg)?;
    let report = batch.run(&company_groups(&cfg)).await?;

    for failure in &report.failures {
        tracing::warn!(handle = %failure.handle, error = %failure.error, "company skipped");
    }
    tracing::info!(
        workbook = %report.workbook.display(),
        tweets = report.tweets,
        annotations = report.annotations,
        companies_fetched = report.companies_fetched,
        companies_empty = report.companies_empty,
        failures = report.failures.len(),
        "outage-watch finished"
    );
    Ok(())
}
