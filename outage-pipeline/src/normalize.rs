//! Tweet/author full outer join for one search page.
use std::collections::HashMap;

use outage_social::twitter::types::{SearchResponse, Tweet, User};

use crate::error::{PipelineError, Result};
use crate::table::JoinedRow;

/// Join `data` with `includes.users` on author id.
///
/// Rows are ordered by author id, with rows lacking one last; rows sharing an
/// author keep response order. A page that reports results but lacks either
/// block is a [`PipelineError::Shape`].
pub fn join_page(page: &SearchResponse) -> Result<Vec<JoinedRow>> {
    let tweets = page.data.as_deref().ok_or(PipelineError::Shape("data"))?;
    let users = page
        .includes
        .as_ref()
        .and_then(|inc| inc.users.as_deref())
        .ok_or(PipelineError::Shape("includes.users"))?;
    Ok(outer_join(tweets, users))
}

pub fn outer_join(tweets: &[Tweet], users: &[User]) -> Vec<JoinedRow> {
    let mut by_id: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, user) in users.iter().enumerate() {
        by_id.entry(user.id.as_str()).or_default().push(idx);
    }

    let mut matched = vec![false; users.len()];
    let mut rows = Vec::with_capacity(tweets.len().max(users.len()));

    for tweet in tweets {
        let hits = tweet
            .author_id
            .as_deref()
            .and_then(|aid| by_id.get(aid))
            .map(Vec::as_slice)
            .unwrap_or_default();

        if hits.is_empty() {
            rows.push(tweet_row(tweet, None));
            continue;
        }
        for &idx in hits {
            matched[idx] = true;
            rows.push(tweet_row(tweet, Some(&users[idx])));
        }
    }

    rows.extend(
        users
            .iter()
            .zip(&matched)
            .filter(|(_, seen)| !**seen)
            .map(|(user, _)| author_row(user)),
    );

    // Stable, so ties keep tweet order followed by author-only rows.
    rows.sort_by(|a, b| {
        (a.author_id.is_none(), &a.author_id).cmp(&(b.author_id.is_none(), &b.author_id))
    });
    rows
}

fn tweet_row(tweet: &Tweet, author: Option<&User>) -> JoinedRow {
    JoinedRow {
        id: Some(tweet.id.clone()),
        conversation_id: tweet.conversation_id.clone(),
        author_id: tweet.author_id.clone(),
        created_at: tweet.created_at.clone(),
        text: Some(tweet.text.clone()),
        annotations: tweet.annotations().map(<[_]>::to_vec),
        username: author.map(|u| u.username.clone()),
        location: author.and_then(|u| u.location.clone()),
    }
}

fn author_row(user: &User) -> JoinedRow {
    JoinedRow {
        author_id: Some(user.id.clone()),
        username: Some(user.username.clone()),
        location: user.location.clone(),
        ..JoinedRow::default()
    }
}
