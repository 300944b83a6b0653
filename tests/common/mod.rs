//! Shared test utilities for castctl integration tests.
//!
//! Provides a wiremock-backed admin server, a client pointed at it, and JSON
//! fixtures shaped like the server's responses.

#![allow(dead_code)]

use castctl::api::{AdminApi, AdminClient};
use castctl::config::ConnectionConfig;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{basic_auth, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Well-Known Test Constants
// =============================================================================

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "s3cret";

// =============================================================================
// Client Builders
// =============================================================================

pub fn connection_for(server: &MockServer) -> ConnectionConfig {
    ConnectionConfig {
        base_url: server.uri(),
        username: ADMIN_USER.to_string(),
        password: ADMIN_PASSWORD.to_string(),
        request_timeout_seconds: 2,
        release_url: format!("{}/releases/latest", server.uri()),
    }
}

pub fn client_for(server: &MockServer) -> Arc<dyn AdminApi> {
    Arc::new(AdminClient::new(&connection_for(server)).unwrap())
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn status_json(viewers: u64) -> Value {
    json!({
        "online": true,
        "broadcastActive": true,
        "viewerCount": viewers,
        "sessionPeakViewerCount": viewers,
        "overallPeakViewerCount": 40,
        "disableUpgradeChecks": false,
        "versionNumber": "0.0.2",
        "broadcaster": {
            "remoteAddr": "127.0.0.1:55000",
            "time": "2020-10-06T21:00:00Z",
            "streamDetails": {
                "videoCodec": "H.264",
                "videoBitrate": 4500,
                "audioCodec": "AAC",
                "audioBitrate": 160,
                "encoder": "OBS",
                "framerate": 30.0,
                "width": 1920,
                "height": 1080
            }
        }
    })
}

pub fn config_json(tags: &[&str]) -> Value {
    json!({
        "instanceDetails": {
            "name": "Late Night",
            "title": "Late Night Streams",
            "summary": "Music after dark",
            "logo": "/img/logo.png",
            "tags": tags,
            "nsfw": false,
            "extraPageContent": "",
            "socialHandles": []
        },
        "streamKey": ADMIN_PASSWORD,
        "ffmpegPath": "/usr/bin/ffmpeg",
        "webServerPort": 8080,
        "rtmpServerPort": 1935,
        "yp": { "enabled": false, "instanceURL": "" },
        "videoSettings": {
            "videoQualityVariants": [
                { "videoPassthrough": false, "audioPassthrough": true, "videoBitrate": 1200, "framerate": 30, "encoderPreset": "veryfast" },
                { "videoPassthrough": false, "audioPassthrough": true, "videoBitrate": 800, "framerate": 24, "encoderPreset": "veryfast" },
                { "videoPassthrough": true, "audioPassthrough": true, "videoBitrate": 0, "framerate": 0, "encoderPreset": "" }
            ],
            "segmentLengthSeconds": 4,
            "numberOfPlaylistItems": 5
        }
    })
}

pub fn chat_message_json(id: &str, author: &str, minute: u32, visible: bool) -> Value {
    json!({
        "id": id,
        "author": author,
        "body": format!("<p>message {}</p>", id),
        "timestamp": format!("2020-10-06T21:{:02}:00Z", minute),
        "visible": visible,
        "type": "CHAT"
    })
}

pub fn ack(success: bool, message: &str) -> Value {
    json!({ "success": success, "message": message })
}

// =============================================================================
// Mock Mounting
// =============================================================================

/// Mount an authenticated GET returning `body`.
pub async fn mount_get(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(basic_auth(ADMIN_USER, ADMIN_PASSWORD))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount an authenticated POST answering with `status` and `body`.
pub async fn mount_post(server: &MockServer, route: &str, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path(route))
        .and(basic_auth(ADMIN_USER, ADMIN_PASSWORD))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// JSON bodies of every POST the server received on `route`.
pub async fn posted_bodies(server: &MockServer, route: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == "POST" && r.url.path() == route)
        .filter_map(|r| serde_json::from_slice(&r.body).ok())
        .collect()
}
