//! Thin wrapper around the Twitter/X recent-search endpoint.
//!
//! Shapes the request parameters (fields, expansions, result limit) and hands the
//! raw JSON page back to the caller, which keeps it for auditing before decoding
//! it into [`crate::twitter::types::SearchResponse`].
use async_trait::async_trait;
use outage_http::{Auth, HttpClient, HttpError, RequestOpts};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.twitter.com";
const RECENT_SEARCH_PATH: &str = "2/tweets/search/recent";

/// Source of recent-search pages, keyed by an already-encoded query.
#[async_trait]
pub trait RecentSearch: Send + Sync {
    async fn recent_search(&self, encoded_query: &str) -> Result<Value, HttpError>;
}

/// Fixed request parameters sent with every search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub max_results: u32,
    pub tweet_fields: &'static str,
    pub expansions: &'static str,
    pub user_fields: &'static str,
    pub place_fields: &'static str,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_results: 100,
            tweet_fields: "author_id,conversation_id,created_at,text,geo,entities",
            expansions: "author_id,geo.place_id",
            user_fields: "location,username",
            place_fields: "contained_within,country,country_code,full_name,geo,id,name,place_type",
        }
    }
}

impl SearchParams {
    /// Path plus query string for one search; `encoded_query` is used verbatim.
    pub fn request_path(&self, encoded_query: &str) -> String {
        // The endpoint rejects anything outside 10..=100.
        let max_results = self.max_results.clamp(10, 100);
        format!(
            "{RECENT_SEARCH_PATH}?query={encoded_query}&max_results={max_results}\
             &tweet.fields={}&expansions={}&user.fields={}&place.fields={}",
            self.tweet_fields, self.expansions, self.user_fields, self.place_fields
        )
    }
}

#[derive(Clone, Debug)]
pub struct TwitterApi {
    http: HttpClient,
    bearer: String,
    params: SearchParams,
}

impl TwitterApi {
    pub fn new(bearer_token: String) -> Result<Self, HttpError> {
        Self::with_base_url(DEFAULT_API_BASE, bearer_token)
    }

    pub fn with_base_url(base: &str, bearer_token: String) -> Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::new(base)?,
            bearer: bearer_token,
            params: SearchParams::default(),
        })
    }

    pub fn with_params(mut self, params: SearchParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }
}

#[async_trait]
impl RecentSearch for TwitterApi {
    async fn recent_search(&self, encoded_query: &str) -> Result<Value, HttpError> {
        let path = self.params.request_path(encoded_query);
        tracing::info!(query = %encoded_query, "twitter.recent_search");

        let page: Value = self
            .http
            .get_json(
                &path,
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.bearer)),
                    ..Default::default()
                },
            )
            .await?;

        tracing::debug!(
            result_count = ?page.pointer("/meta/result_count"),
            "twitter.recent_search.page"
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_path_carries_fixed_fields() {
        let path = SearchParams::default().request_path("to%3AHydroOne+%28power%29");
        assert!(path.starts_with("2/tweets/search/recent?query=to%3AHydroOne+%28power%29&"));
        assert!(path.contains("&max_results=100&"));
        assert!(path.contains("&expansions=author_id,geo.place_id&"));
        assert!(path.contains("&user.fields=location,username&"));
    }

    #[test]
    fn max_results_is_clamped() {
        let params = SearchParams {
            max_results: 500,
            ..SearchParams::default()
        };
        assert!(params.request_path("q").contains("max_results=100"));
        let params = SearchParams {
            max_results: 1,
            ..SearchParams::default()
        };
        assert!(params.request_path("q").contains("max_results=10"));
    }
}
