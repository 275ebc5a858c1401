//! Integration tests for the paginated feed controller.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use atelier_client::api::ApiClient;
use atelier_client::auth::Session;
use atelier_client::feed::{FeedController, FeedFilter};
use atelier_client::models::PublicationType;
use atelier_client::storage::MemoryStore;

fn api(server: &MockServer) -> ApiClient {
    let session = Arc::new(Session::new(Arc::new(MemoryStore::new())));
    ApiClient::new(server.uri(), session).expect("client")
}

fn publication_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "description": format!("sketch {}", id),
        "author": { "userId": 1, "username": "ines" },
        "pubType": "ILLUSTRATION"
    })
}

fn page_json(ids: &[i64], number: u32, last: bool) -> serde_json::Value {
    json!({
        "content": ids.iter().map(|id| publication_json(*id)).collect::<Vec<_>>(),
        "totalElements": ids.len(),
        "totalPages": if last { number + 1 } else { number + 2 },
        "size": 10,
        "number": number,
        "first": number == 0,
        "last": last
    })
}

fn item_ids(controller: &FeedController) -> Vec<i64> {
    controller.snapshot().items.iter().map(|p| p.id).collect()
}

#[tokio::test]
async fn page_zero_then_load_more_concatenates_in_server_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/publication"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[1, 2], 0, false)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/publication"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[3], 1, true)))
        .expect(1)
        .mount(&server)
        .await;

    let controller = FeedController::new(api(&server), FeedFilter::default());
    controller.refresh().await.expect("page 0");
    assert_eq!(item_ids(&controller), vec![1, 2]);
    assert!(controller.has_more());

    controller.load_more().await.expect("page 1");
    assert_eq!(item_ids(&controller), vec![1, 2, 3]);
    assert!(!controller.has_more());

    // The server already signalled the last page: further load_more calls
    // issue no request and change nothing.
    controller.load_more().await.expect("no-op");
    assert_eq!(item_ids(&controller), vec![1, 2, 3]);
}

#[tokio::test]
async fn load_more_is_a_noop_while_a_fetch_is_in_flight() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/publication"))
        .and(query_param("page", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(&[1], 0, false))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/publication"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[2], 1, true)))
        .expect(0)
        .mount(&server)
        .await;

    let controller = FeedController::new(api(&server), FeedFilter::default());
    let (refreshed, piled_on) = tokio::join!(controller.refresh(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        controller.load_more().await
    });
    refreshed.expect("page 0");
    piled_on.expect("no-op while pending");

    assert_eq!(item_ids(&controller), vec![1]);
}

#[tokio::test]
async fn filter_change_replaces_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/publication"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[1, 2], 0, false)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/publication/tag/ink"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[9], 0, true)))
        .expect(1)
        .mount(&server)
        .await;

    let controller = FeedController::new(api(&server), FeedFilter::default());
    controller.refresh().await.expect("global page 0");
    assert_eq!(item_ids(&controller), vec![1, 2]);

    controller
        .set_filter(FeedFilter {
            tag: Some("ink".to_string()),
            ..Default::default()
        })
        .await
        .expect("tag page 0");
    // Replaced, not appended.
    assert_eq!(item_ids(&controller), vec![9]);
}

#[tokio::test]
async fn rapid_filter_toggling_keeps_only_the_latest_filters_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/publication"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(&[1], 0, true))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/publication/tag/ink"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(&[9], 0, true))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Toggle global -> tag -> global before any response resolves.
    let controller = FeedController::new(api(&server), FeedFilter::default());
    let tag_filter = FeedFilter {
        tag: Some("ink".to_string()),
        ..Default::default()
    };
    let (first, second, third) = tokio::join!(
        controller.refresh(),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            controller.set_filter(tag_filter.clone()).await
        },
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            controller.set_filter(FeedFilter::default()).await
        }
    );
    first.expect("initial fetch");
    second.expect("tag fetch");
    third.expect("final fetch");

    // Only the last-issued filter's data survives; the tag page resolved
    // later but against a stale generation.
    assert_eq!(item_ids(&controller), vec![1]);
    assert_eq!(controller.filter(), FeedFilter::default());
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn missing_tag_reads_as_an_empty_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/publication/tag/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_string("tag not found"))
        .expect(1)
        .mount(&server)
        .await;

    let controller = FeedController::new(
        api(&server),
        FeedFilter {
            tag: Some("ghost".to_string()),
            ..Default::default()
        },
    );
    controller.refresh().await.expect("empty result, not error");

    let snapshot = controller.snapshot();
    assert!(snapshot.items.is_empty());
    assert!(!snapshot.has_more);
    assert_eq!(snapshot.last_error, None);
}

#[tokio::test]
async fn tag_server_error_is_not_normalized_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/publication/tag/ink"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let controller = FeedController::new(
        api(&server),
        FeedFilter {
            tag: Some("ink".to_string()),
            ..Default::default()
        },
    );
    controller.refresh().await.expect_err("transport failure surfaces");
    assert!(controller.snapshot().last_error.is_some());
}

#[tokio::test]
async fn malformed_page_body_is_an_error_not_an_empty_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/publication"))
        .respond_with(ResponseTemplate::new(200).set_body_string("definitely not json"))
        .expect(1)
        .mount(&server)
        .await;

    let controller = FeedController::new(api(&server), FeedFilter::default());
    controller.refresh().await.expect_err("bad body is an error");
    assert!(controller.snapshot().items.is_empty());
}

#[tokio::test]
async fn type_and_sort_are_forwarded_as_query_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/publication"))
        .and(query_param("page", "0"))
        .and(query_param("size", "10"))
        .and(query_param("pubType", "PHOTOGRAPHY"))
        .and(query_param("sort", "creationDate,desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[4], 0, true)))
        .expect(1)
        .mount(&server)
        .await;

    let controller = FeedController::new(
        api(&server),
        FeedFilter {
            pub_type: Some(PublicationType::Photography),
            sort: Some("creationDate,desc".to_string()),
            ..Default::default()
        },
    );
    controller.refresh().await.expect("filtered fetch");
    assert_eq!(item_ids(&controller), vec![4]);
}

#[tokio::test]
async fn saved_filter_queries_the_saved_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/saved"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[6], 0, true)))
        .expect(1)
        .mount(&server)
        .await;

    let controller = FeedController::new(
        api(&server),
        FeedFilter {
            only_saved: true,
            // Saved wins over the follow scope at fixed precedence.
            only_following: true,
            ..Default::default()
        },
    );
    controller.refresh().await.expect("saved fetch");
    assert_eq!(item_ids(&controller), vec![6]);
}
