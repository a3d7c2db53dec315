//! One search request per company, with a raw-JSON audit trail.
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use outage_social::twitter::types::SearchResponse;
use outage_social::twitter::RecentSearch;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// Writes each raw page to `<dir>/Query_<query>_<stamp>.json`.
#[derive(Debug, Clone)]
pub struct AuditLog {
    dir: PathBuf,
    stamp: String,
}

impl AuditLog {
    pub fn new(dir: impl Into<PathBuf>, stamp: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stamp: stamp.into(),
        }
    }

    pub fn path_for(&self, encoded_query: &str) -> PathBuf {
        self.dir
            .join(format!("Query_{}_{}.json", encoded_query, self.stamp))
    }

    /// Pretty-print `page` with sorted keys and a four-space indent.
    pub fn write(&self, encoded_query: &str, page: &Value) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(encoded_query);
        let mut file = fs::File::create(&path)?;
        write_sorted_pretty(&mut file, page)?;
        file.flush()?;
        Ok(path)
    }
}

fn write_sorted_pretty<W: Write>(writer: W, page: &Value) -> io::Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
    sorted(page).serialize(&mut ser).map_err(io::Error::from)
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::with_capacity(map.len());
            for key in keys {
                out.insert(key.clone(), sorted(&map[key]));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

pub struct Fetcher {
    source: Arc<dyn RecentSearch>,
    audit: Option<AuditLog>,
}

impl Fetcher {
    pub fn new(source: Arc<dyn RecentSearch>) -> Self {
        Self {
            source,
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Fetch and decode one page. Audit failures are logged, never returned.
    pub async fn fetch(&self, encoded_query: &str) -> Result<SearchResponse> {
        let page = self.source.recent_search(encoded_query).await?;

        if let Some(audit) = &self.audit {
            match audit.write(encoded_query, &page) {
                Ok(path) => tracing::debug!(path = %path.display(), "audit.written"),
                Err(err) => tracing::warn!(
                    dir = %audit.dir.display(),
                    error = %err,
                    "audit.write_failed"
                ),
            }
        }

        Ok(serde_json::from_value(page)?)
    }
}
