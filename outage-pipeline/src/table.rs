//! Row types flowing through the pipeline.
//!
//! Every column is optional: the outer join fills the side without a match
//! with `None`, and missing cells are exported blank.
use outage_social::twitter::types::Annotation;

/// One tweet merged with its author, or an unmatched tweet/author on its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinedRow {
    pub id: Option<String>,
    pub conversation_id: Option<String>,
    /// Join key: the tweet's `author_id`, or the author's own `id` for
    /// author-only rows.
    pub author_id: Option<String>,
    pub created_at: Option<String>,
    pub text: Option<String>,
    /// Kept nested; [`crate::flatten`] expands it into its own table.
    pub annotations: Option<Vec<Annotation>>,
    pub username: Option<String>,
    pub location: Option<String>,
}

/// One annotation, keyed by the tweet it was attached to.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRow {
    pub tweet_id: String,
    pub probability: f64,
    pub kind: String,
    pub normalized_text: String,
}

impl AnnotationRow {
    pub const HEADERS: [&'static str; 4] = ["id", "probability", "type", "normalized_text"];
}

/// Exported tweet columns, in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TweetRow {
    pub id: Option<String>,
    pub conversation_id: Option<String>,
    pub author_id: Option<String>,
    pub created_at: Option<String>,
    pub username: Option<String>,
    pub text: Option<String>,
    pub location: Option<String>,
}

impl TweetRow {
    pub const HEADERS: [&'static str; 7] = [
        "id",
        "conversation_id",
        "author_id",
        "created_at",
        "username",
        "text",
        "location",
    ];

    /// Cells in [`TweetRow::HEADERS`] order.
    pub fn cells(&self) -> [Option<&str>; 7] {
        [
            self.id.as_deref(),
            self.conversation_id.as_deref(),
            self.author_id.as_deref(),
            self.created_at.as_deref(),
            self.username.as_deref(),
            self.text.as_deref(),
            self.location.as_deref(),
        ]
    }
}

impl From<JoinedRow> for TweetRow {
    fn from(row: JoinedRow) -> Self {
        Self {
            id: row.id,
            conversation_id: row.conversation_id,
            author_id: row.author_id,
            created_at: row.created_at,
            username: row.username,
            text: row.text,
            location: row.location,
        }
    }
}
