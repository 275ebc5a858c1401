//! Integration tests for the publication, comment, user, and notification
//! endpoints.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use atelier_client::api::{ApiClient, ImageUpload};
use atelier_client::auth::Session;
use atelier_client::models::{CreateComment, CreatePublication, PageRequest, PublicationType};
use atelier_client::storage::MemoryStore;

fn api(server: &MockServer) -> ApiClient {
    let session = Arc::new(Session::new(Arc::new(MemoryStore::new())));
    ApiClient::new(server.uri(), session).expect("client")
}

#[tokio::test]
async fn create_publication_refetches_the_full_record() {
    let server = MockServer::start().await;
    let api = api(&server);

    // Creation returns a summary; the client follows up for the full record.
    Mock::given(method("POST"))
        .and(path("/publication"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "url": "https://cdn.example/5.jpg",
            "description": "harbor at dusk"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/publication/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "description": "harbor at dusk",
            "author": { "userId": 7, "username": "ines" },
            "pubType": "PHOTOGRAPHY",
            "images": [{ "id": 1, "url": "https://cdn.example/5.jpg" }],
            "tags": [{ "id": 3, "name": "harbor" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = CreatePublication {
        description: Some("harbor at dusk".to_string()),
        content_warning: false,
        machine_generated: false,
        pub_type: PublicationType::Photography,
        tags: Some(vec!["harbor".to_string()]),
        osm_id: None,
        osm_type: None,
        hide_clean_image: None,
    };
    let image = ImageUpload {
        file_name: "dusk.jpg".to_string(),
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
        mime: Some("image/jpeg".to_string()),
    };

    let publication = api
        .create_publication(&draft, &[image])
        .await
        .expect("create");
    assert_eq!(publication.id, 5);
    assert_eq!(publication.images.len(), 1);
    assert_eq!(publication.tags[0].name, "harbor");
}

#[tokio::test]
async fn comment_round_trip() {
    let server = MockServer::start().await;
    let api = api(&server);

    Mock::given(method("GET"))
        .and(path("/publication/5/comment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "text": "lovely light",
                "author": { "userId": 2, "username": "noa" },
                "replies": []
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/publication/5/comment"))
        .and(body_json(json!({ "text": "agreed", "parentId": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2,
            "text": "agreed",
            "author": { "userId": 7, "username": "ines" },
            "replies": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/publication/5/comment/2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let comments = api.comments(5).await.expect("list");
    assert_eq!(comments.len(), 1);

    let reply = api
        .create_comment(
            5,
            &CreateComment {
                text: "agreed".to_string(),
                parent_id: Some(1),
            },
        )
        .await
        .expect("reply");
    assert_eq!(reply.id, 2);

    api.delete_comment(5, 2).await.expect("delete");
}

#[tokio::test]
async fn notifications_listing_and_read_marks() {
    let server = MockServer::start().await;
    let api = api(&server);

    Mock::given(method("GET"))
        .and(path("/notifications"))
        .and(query_param("page", "0"))
        .and(query_param("size", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{
                "id": 9,
                "recipient": { "userId": 7, "username": "ines" },
                "actor": { "userId": 2, "username": "noa" },
                "type": "HEART_ON_POST",
                "referenceId": 5,
                "message": "noa liked your post",
                "read": false
            }],
            "totalElements": 1,
            "totalPages": 1,
            "size": 20,
            "number": 0,
            "first": true,
            "last": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/notifications/9/read"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let page = api
        .notifications(&PageRequest::new(0, 20))
        .await
        .expect("list");
    assert_eq!(page.content.len(), 1);
    assert!(!page.content[0].read);

    api.mark_notification_read(9).await.expect("mark read");
}

#[tokio::test]
async fn follow_probe_scans_the_first_page() {
    let server = MockServer::start().await;
    let api = api(&server);

    Mock::given(method("GET"))
        .and(path("/user/7/following"))
        .and(query_param("page", "0"))
        .and(query_param("size", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                { "userId": 2, "username": "noa" },
                { "userId": 3, "username": "kim" }
            ],
            "totalElements": 2,
            "totalPages": 1,
            "size": 100,
            "number": 0,
            "first": true,
            "last": true
        })))
        .expect(2)
        .mount(&server)
        .await;

    assert!(api.is_following(7, 3).await.expect("probe"));
    assert!(!api.is_following(7, 99).await.expect("probe"));
}

#[tokio::test]
async fn heart_and_save_toggles_post_to_their_routes() {
    let server = MockServer::start().await;
    let api = api(&server);

    Mock::given(method("POST"))
        .and(path("/publication/5/heart"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/user/save/5"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    api.toggle_heart(5).await.expect("heart");
    api.toggle_save(5).await.expect("save");
}
