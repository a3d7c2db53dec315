use outage_http::HttpError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Transport failure or a non-200 response from the search endpoint.
    #[error("search request failed: {0}")]
    Fetch(#[from] HttpError),

    /// A page reported results but lacks a block the join needs.
    #[error("unexpected search page shape: missing `{0}`")]
    Shape(&'static str),

    #[error("failed to decode search page: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unparseable created_at {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("unknown time zone {0:?}")]
    Timezone(String),

    #[error("workbook export failed: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
