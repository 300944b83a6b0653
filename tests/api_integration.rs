//! Admin client integration tests against a mock streaming server.

mod common;

use castctl::api::{AdminApi, AdminClient, ApiError, LogLevel, LogScope, VisibilityRequest};
use common::*;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_status_decodes_broadcaster() {
    let server = MockServer::start().await;
    mount_get(&server, "/api/admin/status", status_json(12)).await;

    let status = client_for(&server).status().await.unwrap();

    assert!(status.online);
    assert_eq!(status.viewer_count, 12);
    assert_eq!(status.version_number, "0.0.2");
    let broadcaster = status.broadcaster.unwrap();
    assert_eq!(broadcaster.remote_addr, "127.0.0.1:55000");
    assert_eq!(broadcaster.stream_details.encoder, "OBS");
}

#[tokio::test]
async fn test_requests_without_credentials_do_not_match() {
    let server = MockServer::start().await;
    mount_get(&server, "/api/admin/status", status_json(1)).await;

    let mut connection = connection_for(&server);
    connection.password = "wrong".to_string();
    let client = AdminClient::new(&connection).unwrap();

    let err = client.status().await.unwrap_err();
    assert!(matches!(err, ApiError::Upstream { status: 404, .. }));
}

#[tokio::test]
async fn test_server_config_decodes_variants() {
    let server = MockServer::start().await;
    mount_get(&server, "/api/admin/serverconfig", config_json(&["music"])).await;

    let config = client_for(&server).server_config().await.unwrap();

    assert_eq!(config.instance_details.tags, vec!["music"]);
    assert_eq!(config.web_server_port, 8080);
    assert_eq!(config.video_settings.video_quality_variants.len(), 3);
    assert!(config.video_settings.video_quality_variants[2].video_passthrough);
}

#[tokio::test]
async fn test_empty_object_chat_history_is_empty_list() {
    let server = MockServer::start().await;
    mount_get(&server, "/api/admin/chat/messages", json!({})).await;

    let messages = client_for(&server).chat_history().await.unwrap();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_chat_history_decodes_messages() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/api/admin/chat/messages",
        json!([
            chat_message_json("a", "alice", 1, true),
            chat_message_json("b", "bob", 2, false)
        ]),
    )
    .await;

    let messages = client_for(&server).chat_history().await.unwrap();
    assert_eq!(messages.len(), 2);
    assert!(!messages[1].visible);
    assert_eq!(messages[1].kind, "CHAT");
}

#[tokio::test]
async fn test_config_update_posts_value_envelope() {
    let server = MockServer::start().await;
    mount_post(&server, "/api/admin/config/tags", 200, ack(true, "changed")).await;

    let response = client_for(&server)
        .update_config("tags", json!(["a", "b"]))
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(
        posted_bodies(&server, "/api/admin/config/tags").await,
        vec![json!({ "value": ["a", "b"] })]
    );
}

#[tokio::test]
async fn test_error_status_with_ack_is_backend_failure() {
    let server = MockServer::start().await;
    mount_post(
        &server,
        "/api/admin/config/webserverport",
        400,
        ack(false, "port must be between 1 and 65535"),
    )
    .await;

    let response = client_for(&server)
        .update_config("webserverport", json!(0))
        .await
        .unwrap();

    assert!(!response.success);
    assert_eq!(response.message, "port must be between 1 and 65535");
}

#[tokio::test]
async fn test_error_status_without_ack_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/config/name"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .update_config("name", json!("x"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Upstream {
            status: 500,
            message: "boom".to_string()
        }
    );
}

#[tokio::test]
async fn test_error_status_with_foreign_json_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/config/name"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "disk full" })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .update_config("name", json!("x"))
        .await
        .unwrap_err();

    match err {
        ApiError::Upstream { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("disk full"));
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_config_with_null_collections_decodes() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/api/admin/serverconfig",
        json!({
            "instanceDetails": { "name": "night radio", "tags": null, "socialHandles": null },
            "videoSettings": { "videoQualityVariants": null }
        }),
    )
    .await;

    let config = client_for(&server).server_config().await.unwrap();

    assert_eq!(config.instance_details.name, "night radio");
    assert!(config.instance_details.tags.is_empty());
    assert!(config.video_settings.video_quality_variants.is_empty());
}

#[tokio::test]
async fn test_visibility_request_body() {
    let server = MockServer::start().await;
    mount_post(
        &server,
        "/api/admin/chat/updatemessagevisibility",
        200,
        ack(true, "changed"),
    )
    .await;

    let request = VisibilityRequest {
        visible: false,
        id_array: vec!["a".to_string(), "b".to_string()],
    };
    let response = client_for(&server)
        .set_message_visibility(&request)
        .await
        .unwrap();

    assert!(response.is_changed());
    assert_eq!(
        posted_bodies(&server, "/api/admin/chat/updatemessagevisibility").await,
        vec![json!({ "visible": false, "idArray": ["a", "b"] })]
    );
}

#[tokio::test]
async fn test_logs_scopes_use_separate_endpoints() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/api/admin/logs",
        json!([{ "level": "info", "message": "started", "time": "2020-10-06T21:00:00Z" }]),
    )
    .await;
    mount_get(
        &server,
        "/api/admin/logs/warnings",
        json!([{ "level": "warning", "message": "slow", "time": "2020-10-06T21:01:00Z" }]),
    )
    .await;

    let client = client_for(&server);
    let all = client.logs(LogScope::All).await.unwrap();
    let warnings = client.logs(LogScope::Warnings).await.unwrap();

    assert_eq!(all[0].level, LogLevel::Info);
    assert_eq!(warnings[0].level, LogLevel::Warning);
    assert_eq!(warnings[0].message, "slow");
}

#[tokio::test]
async fn test_release_is_fetched_without_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/releases/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "v0.0.3",
            "html_url": "https://example.com/r/3",
            "created_at": "2020-10-13T18:00:00Z",
            "body": "* fixes",
            "assets": [{ "id": 1, "name": "linux.zip", "size": 2097152, "browser_download_url": "https://example.com/linux.zip" }]
        })))
        .mount(&server)
        .await;

    let release = client_for(&server).latest_release().await.unwrap();
    assert_eq!(release.name, "v0.0.3");
    assert_eq!(release.assets[0].size, 2_097_152);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(status_json(1))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut connection = connection_for(&server);
    connection.request_timeout_seconds = 1;
    let client = AdminClient::new(&connection).unwrap();

    let err = client.status().await.unwrap_err();
    assert_eq!(err, ApiError::Timeout(1000));
}
