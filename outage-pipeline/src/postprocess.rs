//! Cleanup applied once every company has been collected.
use std::collections::HashSet;
use std::hash::Hash;

use chrono::DateTime;
use chrono_tz::Tz;

use crate::error::{PipelineError, Result};
use crate::table::{AnnotationRow, JoinedRow, TweetRow};

/// Zone `created_at` is rendered in.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;
/// `MM/DD/YYYY HH:MM:SS`
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| PipelineError::Timezone(name.to_string()))
}

/// Keep the first row for each distinct key. Missing keys compare equal to
/// each other.
fn keep_first_by<K, F>(rows: Vec<TweetRow>, key: F) -> Vec<TweetRow>
where
    K: Eq + Hash,
    F: Fn(&TweetRow) -> K,
{
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter().filter(|row| seen.insert(key(row))).collect()
}

pub fn dedupe_by_id(rows: Vec<TweetRow>) -> Vec<TweetRow> {
    keep_first_by(rows, |row| row.id.clone())
}

pub fn dedupe_by_text(rows: Vec<TweetRow>) -> Vec<TweetRow> {
    keep_first_by(rows, |row| row.text.clone())
}

/// By id, then by text: retweet-style copies with fresh ids collapse too.
pub fn dedupe(rows: Vec<TweetRow>) -> Vec<TweetRow> {
    dedupe_by_text(dedupe_by_id(rows))
}

/// Render one UTC RFC 3339 timestamp in `tz` as [`TIMESTAMP_FORMAT`].
///
/// ```
/// use outage_pipeline::postprocess::{localize_timestamp, DEFAULT_TIMEZONE};
///
/// let local = localize_timestamp("2023-01-15T12:00:00.000Z", DEFAULT_TIMEZONE).unwrap();
/// assert_eq!(local, "01/15/2023 07:00:00");
/// ```
pub fn localize_timestamp(raw: &str, tz: Tz) -> Result<String> {
    let parsed = DateTime::parse_from_rfc3339(raw).map_err(|source| PipelineError::Timestamp {
        value: raw.to_string(),
        source,
    })?;
    Ok(parsed.with_timezone(&tz).format(TIMESTAMP_FORMAT).to_string())
}

/// Localize every `created_at`. A value that does not parse is logged and
/// left blank so the rest of the batch still exports.
pub fn localize_timestamps(rows: Vec<TweetRow>, tz: Tz) -> Vec<TweetRow> {
    rows.into_iter()
        .map(|mut row| {
            row.created_at = row.created_at.as_deref().and_then(|raw| {
                localize_timestamp(raw, tz)
                    .inspect_err(|error| {
                        tracing::warn!(id = ?row.id, %error, "postprocess.bad_timestamp");
                    })
                    .ok()
            });
            row
        })
        .collect()
}

/// Drop annotation rows whose tweet did not survive deduplication.
pub fn prune_orphans(annotations: Vec<AnnotationRow>, tweets: &[TweetRow]) -> Vec<AnnotationRow> {
    let kept: HashSet<&str> = tweets.iter().filter_map(|t| t.id.as_deref()).collect();
    annotations
        .into_iter()
        .filter(|a| kept.contains(a.tweet_id.as_str()))
        .collect()
}

/// Both sheets, ready for export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanTables {
    pub tweets: Vec<TweetRow>,
    pub annotations: Vec<AnnotationRow>,
}

#[derive(Debug, Clone)]
pub struct PostProcessor {
    pub timezone: Tz,
    pub prune_orphan_annotations: bool,
}

impl Default for PostProcessor {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            prune_orphan_annotations: false,
        }
    }
}

impl PostProcessor {
    pub fn run(&self, joined: Vec<JoinedRow>, annotations: Vec<AnnotationRow>) -> CleanTables {
        let collected = joined.len();
        let projected: Vec<TweetRow> = joined.into_iter().map(TweetRow::from).collect();
        let deduped = dedupe(projected);
        let tweets = localize_timestamps(deduped, self.timezone);

        let annotations = if self.prune_orphan_annotations {
            let before = annotations.len();
            let pruned = prune_orphans(annotations, &tweets);
            tracing::debug!(dropped = before - pruned.len(), "postprocess.orphans_pruned");
            pruned
        } else {
            annotations
        };

        tracing::info!(
            collected,
            kept = tweets.len(),
            annotations = annotations.len(),
            timezone = %self.timezone,
            "postprocess.done"
        );
        CleanTables {
            tweets,
            annotations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: Option<&str>, text: Option<&str>) -> TweetRow {
        TweetRow {
            id: id.map(str::to_string),
            text: text.map(str::to_string),
            ..TweetRow::default()
        }
    }

    fn annotation(tweet_id: &str) -> AnnotationRow {
        AnnotationRow {
            tweet_id: tweet_id.into(),
            probability: 0.5,
            kind: "Place".into(),
            normalized_text: "Toronto".into(),
        }
    }

    #[test]
    fn dedupe_keeps_first_by_id_then_text() {
        let rows = vec![
            row(Some("1"), Some("power out")),
            row(Some("1"), Some("power out (edited)")),
            row(Some("2"), Some("power out")),
            row(Some("3"), Some("wifi down")),
        ];
        let out = dedupe(rows);
        assert_eq!(out, vec![row(Some("1"), Some("power out")), row(Some("3"), Some("wifi down"))]);
    }

    #[test]
    fn id_pass_runs_before_text_pass() {
        // Text-first would drop id 2 as a copy of the second id 1 and keep only "1".
        let rows = vec![
            row(Some("1"), Some("a")),
            row(Some("1"), Some("b")),
            row(Some("2"), Some("b")),
        ];
        let ids: Vec<_> = dedupe(rows).into_iter().filter_map(|r| r.id).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn missing_keys_collapse_together() {
        let rows = vec![row(None, None), row(None, None), row(Some("1"), Some("x"))];
        assert_eq!(dedupe(rows).len(), 2);
    }

    #[test]
    fn dedupe_is_idempotent() {
        let rows = vec![
            row(Some("1"), Some("a")),
            row(Some("2"), Some("a")),
            row(Some("2"), Some("b")),
            row(Some("3"), Some("c")),
            row(None, Some("c")),
            row(None, None),
            row(Some("4"), None),
        ];
        let once = dedupe(rows);
        let twice = dedupe(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn winter_timestamp_is_utc_minus_five() {
        assert_eq!(
            localize_timestamp("2023-01-15T12:00:00Z", DEFAULT_TIMEZONE).unwrap(),
            "01/15/2023 07:00:00"
        );
    }

    #[test]
    fn summer_timestamp_is_utc_minus_four() {
        assert_eq!(
            localize_timestamp("2023-07-15T12:00:00.000Z", DEFAULT_TIMEZONE).unwrap(),
            "07/15/2023 08:00:00"
        );
    }

    #[test]
    fn conversion_can_cross_midnight() {
        assert_eq!(
            localize_timestamp("2023-03-01T02:30:15Z", DEFAULT_TIMEZONE).unwrap(),
            "02/28/2023 21:30:15"
        );
    }

    #[test]
    fn bad_timestamp_is_an_error() {
        let err = localize_timestamp("yesterday", DEFAULT_TIMEZONE).unwrap_err();
        assert!(matches!(err, PipelineError::Timestamp { ref value, .. } if value == "yesterday"));
    }

    #[test]
    fn missing_created_at_stays_empty() {
        let out = localize_timestamps(vec![row(Some("1"), Some("x"))], DEFAULT_TIMEZONE);
        assert_eq!(out[0].created_at, None);
    }

    #[test]
    fn unparseable_created_at_is_blanked_not_fatal() {
        let mut bad = row(Some("1"), Some("x"));
        bad.created_at = Some("yesterday".into());
        let mut good = row(Some("2"), Some("y"));
        good.created_at = Some("2023-01-15T12:00:00Z".into());

        let out = localize_timestamps(vec![bad, good], DEFAULT_TIMEZONE);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].created_at, None);
        assert_eq!(out[1].created_at.as_deref(), Some("01/15/2023 07:00:00"));
    }

    #[test]
    fn timezone_names_are_validated() {
        assert_eq!(parse_timezone("America/New_York").unwrap(), DEFAULT_TIMEZONE);
        assert!(matches!(parse_timezone("Mars/Olympus"), Err(PipelineError::Timezone(_))));
    }

    #[test]
    fn prune_drops_annotations_of_removed_tweets() {
        let tweets = vec![row(Some("1"), Some("a"))];
        let kept = prune_orphans(vec![annotation("1"), annotation("2")], &tweets);
        assert_eq!(kept, vec![annotation("1")]);
    }

    #[test]
    fn run_projects_dedupes_and_converts() {
        let joined = vec![
            JoinedRow {
                id: Some("1".into()),
                conversation_id: Some("1".into()),
                author_id: Some("a".into()),
                created_at: Some("2023-01-15T12:00:00.000Z".into()),
                text: Some("power out".into()),
                annotations: None,
                username: Some("alice".into()),
                location: Some("Ajax".into()),
            },
            JoinedRow {
                id: Some("2".into()),
                text: Some("power out".into()),
                ..JoinedRow::default()
            },
        ];

        let keep_orphans = PostProcessor::default()
            .run(joined.clone(), vec![annotation("1"), annotation("2")]);
        assert_eq!(keep_orphans.tweets.len(), 1);
        assert_eq!(keep_orphans.annotations.len(), 2);
        let tweet = &keep_orphans.tweets[0];
        assert_eq!(tweet.created_at.as_deref(), Some("01/15/2023 07:00:00"));
        assert_eq!(tweet.username.as_deref(), Some("alice"));
        assert_eq!(tweet.location.as_deref(), Some("Ajax"));

        let pruning = PostProcessor {
            prune_orphan_annotations: true,
            ..PostProcessor::default()
        };
        let pruned = pruning.run(joined, vec![annotation("1"), annotation("2")]);
        assert_eq!(pruned.annotations, vec![annotation("1")]);
    }
}
