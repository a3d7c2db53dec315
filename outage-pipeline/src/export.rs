//! Two-sheet workbook output.
use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::{PipelineError, Result};
use crate::table::{AnnotationRow, TweetRow};

pub const TWEETS_SHEET: &str = "OutageTweets";
pub const ANNOTATIONS_SHEET: &str = "EntityAnnotations";

/// `<dir>/RecentSearchGrab_<stamp>.xlsx`
pub fn workbook_path(dir: &Path, stamp: &str) -> PathBuf {
    dir.join(format!("RecentSearchGrab_{stamp}.xlsx"))
}

fn write_header(sheet: &mut Worksheet, headers: &[&str], bold: &Format) -> Result<()> {
    for (col, name) in (0u16..).zip(headers) {
        sheet.write_string_with_format(0, col, *name, bold)?;
    }
    Ok(())
}

/// Write both tables, header row first, no index column. Missing cells stay blank.
pub fn write_workbook(path: &Path, tweets: &[TweetRow], annotations: &[AnnotationRow]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PipelineError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let bold = Format::new().set_bold();
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(TWEETS_SHEET)?;
    write_header(sheet, &TweetRow::HEADERS, &bold)?;
    for (row_idx, tweet) in (1u32..).zip(tweets) {
        for (col, cell) in (0u16..).zip(tweet.cells()) {
            if let Some(value) = cell {
                sheet.write_string(row_idx, col, value)?;
            }
        }
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name(ANNOTATIONS_SHEET)?;
    write_header(sheet, &AnnotationRow::HEADERS, &bold)?;
    for (row_idx, a) in (1u32..).zip(annotations) {
        sheet.write_string(row_idx, 0, &a.tweet_id)?;
        sheet.write_number(row_idx, 1, a.probability)?;
        sheet.write_string(row_idx, 2, &a.kind)?;
        sheet.write_string(row_idx, 3, &a.normalized_text)?;
    }

    workbook.save(path)?;
    tracing::info!(
        path = %path.display(),
        tweets = tweets.len(),
        annotations = annotations.len(),
        "export.workbook_saved"
    );
    Ok(())
}
