//! End-to-end tests: real listener, upstream engine, mock JSON:API backend.

use std::net::SocketAddr;
use std::sync::Arc;

use jsonapi_router::config::RouterConfig;
use jsonapi_router::engine::UpstreamEngine;
use jsonapi_router::http::{HttpServer, JSON_API_MEDIA_TYPE};
use jsonapi_router::lifecycle::Shutdown;

mod common;

async fn start_router(mut config: RouterConfig, shutdown: &Shutdown) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let engine = UpstreamEngine::from_config(&config.upstream).unwrap();
    let server = HttpServer::new(config, Arc::new(engine));
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    addr
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_fetch_is_forwarded_with_query_and_identity() {
    let (backend, seen) = common::start_programmable_backend(|_| {
        (200, r#"{"data":[{"type":"users","id":"1"}]}"#.to_string())
    })
    .await;

    let mut config = RouterConfig::default();
    config.mount.base_path = "/api".into();
    config.upstream.url = format!("http://{}/jsonapi/", backend);
    let shutdown = Shutdown::new();
    let addr = start_router(config, &shutdown).await;

    let res = client()
        .get(format!("http://{}/api/users?filter=a&filter=b", addr))
        .header("Authorization", "Bearer opaque")
        .send()
        .await
        .expect("Router unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], JSON_API_MEDIA_TYPE);
    assert_eq!(res.text().await.unwrap(), r#"{"data":[{"type":"users","id":"1"}]}"#);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].uri, "/jsonapi/users?filter=a&filter=b");
    assert_eq!(seen[0].headers["authorization"], "Bearer opaque");
    assert_eq!(seen[0].headers["accept"], JSON_API_MEDIA_TYPE);

    shutdown.trigger();
}

#[tokio::test]
async fn test_update_error_status_is_echoed() {
    let reply = r#"{"errors":[{"status":"422","detail":"name is blank"}]}"#;
    let (backend, seen) = common::start_programmable_backend(move |_| (422, reply.to_string())).await;

    let mut config = RouterConfig::default();
    config.upstream.url = format!("http://{}", backend);
    let shutdown = Shutdown::new();
    let addr = start_router(config, &shutdown).await;

    let document = r#"{"data":{"type":"users","id":"1","attributes":{"name":""}}}"#;
    let res = client()
        .patch(format!("http://{}/users/1", addr))
        .header("Content-Type", JSON_API_MEDIA_TYPE)
        .body(document)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 422);
    assert_eq!(res.text().await.unwrap(), reply);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].method, "PATCH");
    assert_eq!(seen[0].uri, "/users/1");
    assert_eq!(seen[0].headers["content-type"], JSON_API_MEDIA_TYPE);
    assert_eq!(seen[0].body, document);

    shutdown.trigger();
}

#[tokio::test]
async fn test_delete_without_body_sends_no_content_type() {
    let (backend, seen) = common::start_programmable_backend(|_| (204, String::new())).await;

    let mut config = RouterConfig::default();
    config.upstream.url = format!("http://{}", backend);
    let shutdown = Shutdown::new();
    let addr = start_router(config, &shutdown).await;

    let res = client()
        .delete(format!("http://{}/users/9", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 204);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].method, "DELETE");
    assert!(seen[0].headers.get("content-type").is_none());
    assert!(seen[0].body.is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_internal_error() {
    // Grab a free port, then release it so nothing listens there.
    let free = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = free.local_addr().unwrap();
    drop(free);

    let mut config = RouterConfig::default();
    config.upstream.url = format!("http://{}", dead);
    let shutdown = Shutdown::new();
    let addr = start_router(config, &shutdown).await;

    let res = client()
        .get(format!("http://{}/users", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let document: serde_json::Value = res.json().await.unwrap();
    assert!(document["errors"][0]["detail"]
        .as_str()
        .unwrap()
        .contains("unavailable"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_oversized_upstream_response_is_internal_error() {
    let (backend, _) = common::start_programmable_backend(|_| (200, "x".repeat(4096))).await;

    let mut config = RouterConfig::default();
    config.upstream.url = format!("http://{}", backend);
    config.upstream.max_response_size = 1024;
    let shutdown = Shutdown::new();
    let addr = start_router(config, &shutdown).await;

    let res = client()
        .get(format!("http://{}/users", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let document: serde_json::Value = res.json().await.unwrap();
    assert_eq!(document["errors"][0]["status"], "500");

    shutdown.trigger();
}

#[tokio::test]
async fn test_encoded_path_reaches_backend_encoded() {
    let (backend, seen) = common::start_programmable_backend(|_| (200, "{}".to_string())).await;

    let mut config = RouterConfig::default();
    config.mount.base_path = "/api".into();
    config.upstream.url = format!("http://{}", backend);
    let shutdown = Shutdown::new();
    let addr = start_router(config, &shutdown).await;

    let res = client()
        .get(format!("http://{}/api/users/J%C3%B6rg%20S", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].uri, "/users/J%C3%B6rg%20S");

    shutdown.trigger();
}
