//! Integration tests for `ProfileResolver::fetch_profile`.
//!
//! Both endpoints point at one `wiremock` server: the API lives under
//! `/api/v1/users/web_profile_info/` and the profile page under `/{user}/`.
//! `.expect(n)` assertions check which payloads each scenario fetched.

use igfc_core::RequestSettings;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use igfc_scraper::{HttpClient, ProfileResolver, ResolverEndpoints};

const API_PATH: &str = "/api/v1/users/web_profile_info/";

fn test_resolver(server: &MockServer) -> ProfileResolver {
    let client = HttpClient::new(&RequestSettings {
        timeout_seconds: 5,
        retries: 0,
        delay_ms_min: 0,
        delay_ms_max: 0,
        backoff_base_ms: 0,
        seed: Some(42),
        ..RequestSettings::default()
    })
    .expect("failed to build test HttpClient");

    ProfileResolver::new(client).with_endpoints(ResolverEndpoints {
        api_base: server.uri(),
        web_base: server.uri(),
    })
}

fn api_user_json() -> serde_json::Value {
    json!({
        "data": {"user": {
            "username": "nike",
            "full_name": "Nike",
            "biography": "Just do it.",
            "is_verified": true,
            "profile_pic_url_hd": "https://cdn.example.com/nike_hd.jpg",
            "edge_followed_by": {"count": 306_000_000},
            "edge_follow": {"count": 160},
            "edge_owner_to_timeline_media": {
                "count": 1234,
                "edges": [
                    {"node": {"edge_liked_by": {"count": 3_000_000}, "edge_media_to_comment": {"count": 60_000}}}
                ]
            }
        }},
        "status": "ok"
    })
}

async fn mount_api(server: &MockServer, template: ResponseTemplate, expected: u64) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("username", "nike"))
        .respond_with(template)
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, html: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/nike/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html.to_string()))
        .expect(expected)
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Strategy 1: structured API
// ---------------------------------------------------------------------------

#[tokio::test]
async fn api_success_never_fetches_profile_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("username", "nike"))
        .and(header("x-ig-app-id", "936619743392459"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(api_user_json()))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "<html></html>", 0).await;

    let record = test_resolver(&server)
        .fetch_profile("@Nike")
        .await
        .unwrap()
        .expect("expected a record");

    assert_eq!(record.username, "nike");
    assert_eq!(record.full_name, "Nike");
    assert_eq!(record.bio, "Just do it.");
    assert_eq!(record.followers_count, 306_000_000);
    assert_eq!(record.following_count, 160);
    assert_eq!(record.posts_count, 1234);
    assert!(record.is_verified);
    assert_eq!(record.profile_url, "https://www.instagram.com/nike/");
    assert_eq!(
        record.profile_image.as_deref(),
        Some("https://cdn.example.com/nike_hd.jpg")
    );
    // (3_000_000 + 60_000) / 306_000_000 * 100
    assert_eq!(record.engagement_rate, Some(1.0));
}

// ---------------------------------------------------------------------------
// Strategy 2: JSON-LD
// ---------------------------------------------------------------------------

#[tokio::test]
async fn api_404_falls_back_to_json_ld() {
    let server = MockServer::start().await;
    mount_api(&server, ResponseTemplate::new(404), 1).await;
    let html = r#"<html><head>
<script type="application/ld+json">
{"@context": "https://schema.org", "@type": "Person", "name": "Nike", "alternateName": "@nike",
 "description": "Just do it.",
 "interactionStatistic": [
   {"@type": "InteractionCounter", "interactionType": "http://schema.org/FollowAction", "userInteractionCount": "306,000,000"},
   {"@type": "InteractionCounter", "interactionType": "http://schema.org/WriteAction", "userInteractionCount": 1234}
 ]}
</script></head><body></body></html>"#;
    mount_page(&server, html, 1).await;

    let record = test_resolver(&server)
        .fetch_profile("https://www.instagram.com/nike/")
        .await
        .unwrap()
        .expect("expected a record");

    assert_eq!(record.username, "nike");
    assert_eq!(record.full_name, "Nike");
    assert_eq!(record.followers_count, 306_000_000);
    assert_eq!(record.following_count, 0);
    assert_eq!(record.posts_count, 1234);
    assert_eq!(record.engagement_rate, None);
}

#[tokio::test]
async fn unparseable_api_body_falls_back_to_page() {
    let server = MockServer::start().await;
    mount_api(
        &server,
        ResponseTemplate::new(200).set_body_string("<html>please log in</html>"),
        1,
    )
    .await;
    let html = r#"<script type="application/ld+json">{"@type": "Person", "interactionStatistic": {"interactionType": "FollowAction", "userInteractionCount": 9}}</script>"#;
    mount_page(&server, html, 1).await;

    let record = test_resolver(&server)
        .fetch_profile("nike")
        .await
        .unwrap()
        .expect("expected a record");
    assert_eq!(record.followers_count, 9);
}

// ---------------------------------------------------------------------------
// Strategies 3 and 4: embedded blob and heuristics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shared_data_blob_when_no_json_ld() {
    let server = MockServer::start().await;
    mount_api(&server, ResponseTemplate::new(403), 1).await;
    let html = r#"<html><script type="text/javascript">window._sharedData = {"entry_data": {"ProfilePage": [{"graphql": {"user": {"username": "nike", "full_name": "Nike", "edge_followed_by": {"count": 1000}, "edge_follow": {"count": 10}, "edge_owner_to_timeline_media": {"count": 5}}}}]}};</script></html>"#;
    mount_page(&server, html, 1).await;

    let record = test_resolver(&server)
        .fetch_profile("nike")
        .await
        .unwrap()
        .expect("expected a record");
    assert_eq!(record.followers_count, 1000);
    assert_eq!(record.following_count, 10);
    assert_eq!(record.posts_count, 5);
}

#[tokio::test]
async fn meta_description_heuristic_as_last_resort() {
    let server = MockServer::start().await;
    mount_api(&server, ResponseTemplate::new(500), 1).await;
    let html = r#"<html><head><meta property="og:description" content="1.2M Followers, 150 Following, 1,234 Posts - See Instagram photos and videos from Nike (&#064;nike)"></head></html>"#;
    mount_page(&server, html, 1).await;

    let record = test_resolver(&server)
        .fetch_profile("nike")
        .await
        .unwrap()
        .expect("expected a record");
    assert_eq!(record.full_name, "Nike");
    assert_eq!(record.followers_count, 1_200_000);
    assert_eq!(record.following_count, 150);
    assert_eq!(record.posts_count, 1234);
}

// ---------------------------------------------------------------------------
// Total failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn every_strategy_missing_yields_none() {
    let server = MockServer::start().await;
    mount_api(&server, ResponseTemplate::new(404), 1).await;
    mount_page(&server, "<html><title>Login • Instagram</title></html>", 1).await;

    let result = test_resolver(&server).fetch_profile("nike").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn empty_page_body_yields_none() {
    let server = MockServer::start().await;
    mount_api(&server, ResponseTemplate::new(404), 1).await;
    mount_page(&server, "   ", 1).await;

    let result = test_resolver(&server).fetch_profile("nike").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn empty_username_makes_no_requests() {
    let server = MockServer::start().await;

    for input in ["", "   ", "https://instagram.com/", "@"] {
        let result = test_resolver(&server).fetch_profile(input).await.unwrap();
        assert!(result.is_none(), "{input:?}");
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unusable_endpoint_is_an_error() {
    let client = HttpClient::new(&RequestSettings {
        delay_ms_min: 0,
        delay_ms_max: 0,
        seed: Some(1),
        ..RequestSettings::default()
    })
    .unwrap();
    let resolver = ProfileResolver::new(client).with_endpoints(ResolverEndpoints {
        api_base: "not a url".to_string(),
        web_base: "not a url".to_string(),
    });

    assert!(resolver.fetch_profile("nike").await.is_err());
}
