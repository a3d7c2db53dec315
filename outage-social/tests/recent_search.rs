use outage_social::twitter::types::SearchResponse;
use outage_social::twitter::{RecentSearch, TwitterApi, encoded_query};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn recent_search_requests_expansions_and_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .and(query_param("query", "to:LondonHydro (power OR out OR #outage)"))
        .and(query_param("max_results", "100"))
        .and(query_param("tweet.fields", "author_id,conversation_id,created_at,text,geo,entities"))
        .and(query_param("expansions", "author_id,geo.place_id"))
        .and(header("authorization", "Bearer token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "1", "text": "no power", "author_id": "9" }],
            "includes": { "users": [{ "id": "9", "username": "bob" }] },
            "meta": { "result_count": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = TwitterApi::with_base_url(&server.uri(), "token-123".into()).unwrap();
    let page = api
        .recent_search(&encoded_query("LondonHydro", "power OR out OR #outage"))
        .await
        .unwrap();

    let resp: SearchResponse = serde_json::from_value(page).unwrap();
    assert_eq!(resp.result_count(), 1);
    assert_eq!(resp.data.unwrap()[0].author_id.as_deref(), Some("9"));
}

#[tokio::test]
async fn unauthorized_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let api = TwitterApi::with_base_url(&server.uri(), "bad".into()).unwrap();
    let err = api.recent_search("to%3Ax").await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
}
