//! End-to-end tests against a spawned server binary.
//!
//! Source sites point at unroutable local addresses, so search
//! pipelines exercise the per-source failure path without touching
//! the network.

use std::net::TcpListener;
use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tempfile::TempDir;
use tokio::time::sleep;

/// Find an available port
fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Lay out config, site list and cache dir inside a temp dir.
fn write_fixture(dir: &Path, port: u16) -> std::path::PathBuf {
    let sites = r#"{
        "api_site": {
            "api.alpha.com": { "name": "Alpha", "api": "http://127.0.0.1:1/provide/vod/" },
            "beta.tv": { "name": "Beta", "api": "http://127.0.0.1:1/api.php/provide/vod/" }
        }
    }"#;
    std::fs::write(dir.join("sources.json"), sites).unwrap();
    std::fs::create_dir_all(dir.join("output")).unwrap();
    std::fs::create_dir_all(dir.join("front")).unwrap();

    let config = format!(
        r#"
[server]
host = "127.0.0.1"
port = {port}

[fetcher]
connect_timeout_secs = 1
request_timeout_secs = 2

[paths]
sites = "{sites}"
cache_dir = "{cache}"
front_dir = "{front}"
"#,
        port = port,
        sites = dir.join("sources.json").display(),
        cache = dir.join("output").display(),
        front = dir.join("front").display(),
    );

    let config_path = dir.join("config.toml");
    std::fs::write(&config_path, config).unwrap();
    config_path
}

/// Seed one cached response file so startup finds a catalog on disk.
fn seed_cache(dir: &Path) {
    let body = r#"{
        "list": [
            {"vod_id": 1, "vod_name": "Seeded Show", "type_name": "Drama",
             "vod_play_from": "m1", "vod_play_url": "e1$1.mp4#e2$2.mp4"}
        ]
    }"#;
    std::fs::write(dir.join("output").join("api_alpha_com.json"), body).unwrap();
}

/// Spawn the server and return a handle
fn spawn_server(config_path: &Path) -> tokio::process::Child {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_vodpool"))
        .env("VODPOOL_CONFIG", config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server")
}

/// Wait for server to be ready
async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if client
            .get(format!("http://127.0.0.1:{}/api/v1/health", port))
            .send()
            .await
            .is_ok()
        {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn test_health_and_status_endpoints() {
    let dir = TempDir::new().unwrap();
    let port = get_available_port();
    let config_path = write_fixture(dir.path(), port);

    let _server = spawn_server(&config_path);
    assert!(
        wait_for_server(port, 60).await,
        "Server did not start in time"
    );

    let client = Client::new();
    let health: serde_json::Value = client
        .get(format!("http://127.0.0.1:{}/api/v1/health", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let status: serde_json::Value = client
        .get(format!("http://127.0.0.1:{}/api/v1/status", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["sources"], 2);
    assert_eq!(status["titles"], 0);
}

#[tokio::test]
async fn test_startup_builds_catalog_from_existing_cache() {
    let dir = TempDir::new().unwrap();
    let port = get_available_port();
    let config_path = write_fixture(dir.path(), port);
    seed_cache(dir.path());

    let _server = spawn_server(&config_path);
    assert!(wait_for_server(port, 60).await);

    let client = Client::new();
    let videos: serde_json::Value = client
        .get(format!("http://127.0.0.1:{}/api/v1/videos", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(videos["titles"], 1);
    let record = &videos["videos"]["Seeded Show"][0];
    assert_eq!(record["id"], 1);
    assert_eq!(record["source_tag"], "api_alpha_com");
    assert_eq!(record["play_tracks"]["m1"][0]["label"], "e1");
    assert_eq!(record["play_tracks"]["m1"][0]["url"], "1.mp4");

    // Facade search and categories over the same snapshot.
    let results: serde_json::Value = client
        .get(format!(
            "http://127.0.0.1:{}/api/v1/videos/search?q=seeded",
            port
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(results["total"], 1);

    let categories: serde_json::Value = client
        .get(format!("http://127.0.0.1:{}/api/v1/categories", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(categories["categories"]["Drama"], 1);
}

#[tokio::test]
async fn test_get_video_by_id_not_found() {
    let dir = TempDir::new().unwrap();
    let port = get_available_port();
    let config_path = write_fixture(dir.path(), port);

    let _server = spawn_server(&config_path);
    assert!(wait_for_server(port, 60).await);

    let response = Client::new()
        .get(format!("http://127.0.0.1:{}/api/v1/videos/999", port))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_search_with_all_sources_down_succeeds_empty() {
    let dir = TempDir::new().unwrap();
    let port = get_available_port();
    let config_path = write_fixture(dir.path(), port);
    seed_cache(dir.path());

    let _server = spawn_server(&config_path);
    assert!(wait_for_server(port, 60).await);

    let client = Client::new();
    let response = client
        .post(format!("http://127.0.0.1:{}/api/v1/search", port))
        .json(&serde_json::json!({ "keyword": "anything" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["records"], 0);

    // The purge removed the seeded file; the replaced catalog is empty.
    assert!(!dir.path().join("output/api_alpha_com.json").exists());
    let videos: serde_json::Value = client
        .get(format!("http://127.0.0.1:{}/api/v1/videos", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(videos["titles"], 0);
}

#[tokio::test]
async fn test_search_rejects_empty_keyword() {
    let dir = TempDir::new().unwrap();
    let port = get_available_port();
    let config_path = write_fixture(dir.path(), port);

    let _server = spawn_server(&config_path);
    assert!(wait_for_server(port, 60).await);

    let response = Client::new()
        .post(format!("http://127.0.0.1:{}/api/v1/search", port))
        .json(&serde_json::json!({ "keyword": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_sources_endpoint_lists_configured_sites() {
    let dir = TempDir::new().unwrap();
    let port = get_available_port();
    let config_path = write_fixture(dir.path(), port);

    let _server = spawn_server(&config_path);
    assert!(wait_for_server(port, 60).await);

    let sources: serde_json::Value = Client::new()
        .get(format!("http://127.0.0.1:{}/api/v1/sources", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let list = sources["sources"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], "api.alpha.com");
    assert_eq!(list[0]["name"], "Alpha");
}
