//! Search query construction for company-directed complaint tweets.
use url::form_urlencoded;

/// Raw query for tweets addressed to `handle` matching any keyword in `filter`.
///
/// ```
/// use outage_social::twitter::build_query;
///
/// assert_eq!(
///     build_query("HydroOne", "power OR out OR #outage"),
///     "to:HydroOne (power OR out OR #outage)"
/// );
/// ```
pub fn build_query(handle: &str, filter: &str) -> String {
    format!("to:{handle} ({filter})")
}

/// Form-encode a query for splicing into a URL: spaces become `+`, reserved
/// characters are percent-encoded.
pub fn encode_query(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

/// [`build_query`] followed by [`encode_query`].
pub fn encoded_query(handle: &str, filter: &str) -> String {
    encode_query(&build_query(handle, filter))
}
