mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use shortlink::infrastructure::memory::MemoryStore;
use std::sync::Arc;

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Store with one owner holding five links `link01`..`link05`, created in order.
async fn seeded() -> (TestServer, Arc<MemoryStore>, String) {
    let store = Arc::new(MemoryStore::new());
    let token = common::create_owner(&store, "alice").await;

    for i in 1..=5 {
        let url = if i % 2 == 0 {
            format!("https://docs.example.com/page/{i}")
        } else {
            format!("https://blog.example.org/post/{i}")
        };
        common::create_test_link(&store, &token, &format!("link0{i}"), &url, None).await;
    }

    (common::make_server(store.clone()), store, token)
}

// ─── LIST ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_links_defaults() {
    let (server, _store, token) = seeded().await;

    let response = server.get("/urls").add_header("Authorization", bearer(&token)).await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["total"], 5);
    assert_eq!(json["currentPage"], 1);
    assert_eq!(json["totalPages"], 1);

    let urls = json["urls"].as_array().unwrap();
    assert_eq!(urls.len(), 5);
    // Newest first.
    assert_eq!(urls[0]["code"], "link05");
    assert_eq!(urls[4]["code"], "link01");
    assert_eq!(urls[0]["shortUrl"], format!("{}/link05", common::BASE_URL));
}

#[tokio::test]
async fn test_list_links_pagination() {
    let (server, _store, token) = seeded().await;

    let response = server
        .get("/urls?page=2&limit=2")
        .add_header("Authorization", bearer(&token))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["total"], 5);
    assert_eq!(json["currentPage"], 2);
    assert_eq!(json["totalPages"], 3);

    let codes: Vec<&str> = json["urls"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, ["link03", "link02"]);
}

#[tokio::test]
async fn test_list_links_page_past_end_is_empty() {
    let (server, _store, token) = seeded().await;

    let response = server
        .get("/urls?page=9&limit=2")
        .add_header("Authorization", bearer(&token))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["total"], 5);
    assert!(json["urls"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_links_search_is_case_insensitive() {
    let (server, _store, token) = seeded().await;

    let response = server
        .get("/urls?search=DOCS")
        .add_header("Authorization", bearer(&token))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["total"], 2);
    for url in json["urls"].as_array().unwrap() {
        assert!(url["originalUrl"].as_str().unwrap().contains("docs.example.com"));
    }
}

#[tokio::test]
async fn test_list_links_search_matches_code() {
    let (server, _store, token) = seeded().await;

    let response = server
        .get("/urls?search=link04")
        .add_header("Authorization", bearer(&token))
        .await;

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["total"], 1);
    assert_eq!(json["urls"][0]["code"], "link04");
}

#[tokio::test]
async fn test_list_links_invalid_params() {
    let (server, _store, token) = seeded().await;

    for query in ["/urls?page=0", "/urls?limit=0", "/urls?limit=101"] {
        let response = server.get(query).add_header("Authorization", bearer(&token)).await;
        response.assert_status_bad_request();
    }
}

#[tokio::test]
async fn test_list_links_scoped_to_owner() {
    let (server, store, _alice) = seeded().await;
    let bob = common::create_owner(&store, "bob").await;
    common::create_test_link(&store, &bob, "bob001", "https://bob.example.com", None).await;

    let response = server.get("/urls").add_header("Authorization", bearer(&bob)).await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["total"], 1);
    assert_eq!(json["urls"][0]["code"], "bob001");
}

#[tokio::test]
async fn test_list_links_requires_token() {
    let (server, _store, _token) = seeded().await;

    server.get("/urls").await.assert_status_unauthorized();
}

// ─── GET ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_link() {
    let store = Arc::new(MemoryStore::new());
    let token = common::create_owner(&store, "alice").await;
    let link =
        common::create_test_link(&store, &token, "get001", "https://example.com", None).await;
    let server = common::make_server(store);

    let response = server
        .get(&format!("/urls/{}", link.id))
        .add_header("Authorization", bearer(&token))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["id"], link.id);
    assert_eq!(json["code"], "get001");
    assert_eq!(json["originalUrl"], "https://example.com");
}

#[tokio::test]
async fn test_get_link_of_other_owner_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let alice = common::create_owner(&store, "alice").await;
    let bob = common::create_owner(&store, "bob").await;
    let link =
        common::create_test_link(&store, &alice, "get002", "https://example.com", None).await;
    let server = common::make_server(store);

    let response = server
        .get(&format!("/urls/{}", link.id))
        .add_header("Authorization", bearer(&bob))
        .await;

    response.assert_status_not_found();
}

// ─── DELETE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_link_success() {
    let store = Arc::new(MemoryStore::new());
    let token = common::create_owner(&store, "alice").await;
    let link =
        common::create_test_link(&store, &token, "del001", "https://example.com", None).await;
    let server = common::make_server(store);

    server
        .delete(&format!("/urls/{}", link.id))
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    // The code stops resolving once deleted.
    server.get("/del001").await.assert_status_not_found();
}

#[tokio::test]
async fn test_delete_link_twice() {
    let store = Arc::new(MemoryStore::new());
    let token = common::create_owner(&store, "alice").await;
    let link =
        common::create_test_link(&store, &token, "del002", "https://example.com", None).await;
    let server = common::make_server(store);

    server
        .delete(&format!("/urls/{}", link.id))
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .delete(&format!("/urls/{}", link.id))
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_link_of_other_owner_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let alice = common::create_owner(&store, "alice").await;
    let bob = common::create_owner(&store, "bob").await;
    let link =
        common::create_test_link(&store, &alice, "del003", "https://example.com", None).await;
    let server = common::make_server(store);

    server
        .delete(&format!("/urls/{}", link.id))
        .add_header("Authorization", bearer(&bob))
        .await
        .assert_status_not_found();

    // Still resolves for visitors.
    assert_eq!(server.get("/del003").await.status_code(), 302);
}
