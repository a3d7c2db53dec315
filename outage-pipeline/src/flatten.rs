//! Expands the nested per-tweet annotation lists into a flat table.
use crate::table::{AnnotationRow, JoinedRow};

/// One [`AnnotationRow`] per annotation, tagged with its parent tweet id.
///
/// Rows without a tweet id (author-only rows) or without annotations
/// contribute nothing.
pub fn flatten_annotations(rows: &[JoinedRow]) -> Vec<AnnotationRow> {
    rows.iter()
        .filter_map(|row| Some((row.id.as_deref()?, row.annotations.as_deref()?)))
        .flat_map(|(tweet_id, annotations)| {
            annotations.iter().map(move |a| AnnotationRow {
                tweet_id: tweet_id.to_string(),
                probability: a.probability,
                kind: a.kind.clone(),
                normalized_text: a.normalized_text.clone(),
            })
        })
        .collect()
}
