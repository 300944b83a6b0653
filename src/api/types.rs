//! Wire types for the admin REST API.
//!
//! Field names follow the backend's camelCase JSON. Every struct is lenient:
//! missing fields fall back to their defaults so that an older or newer server
//! never breaks a poll.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Go encodes an empty slice as `null`; read that as the default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Server status
// ============================================================================

/// Live server status, replaced wholesale on every poll tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerStatus {
    pub online: bool,
    pub broadcast_active: bool,
    pub broadcaster: Option<Broadcaster>,
    pub viewer_count: u64,
    pub session_max_viewer_count: u64,
    pub session_peak_viewer_count: u64,
    pub overall_peak_viewer_count: u64,
    pub disable_upgrade_checks: bool,
    pub version_number: String,
}

impl Default for ServerStatus {
    fn default() -> Self {
        Self {
            online: false,
            broadcast_active: false,
            broadcaster: None,
            viewer_count: 0,
            session_max_viewer_count: 0,
            session_peak_viewer_count: 0,
            overall_peak_viewer_count: 0,
            disable_upgrade_checks: true,
            version_number: "0.0.0".to_string(),
        }
    }
}

/// The client currently pushing a stream into the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Broadcaster {
    #[serde(default)]
    pub remote_addr: String,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub stream_details: StreamDetails,
}

/// Inbound stream parameters as reported by the encoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamDetails {
    pub video_codec: String,
    pub video_bitrate: u32,
    pub audio_codec: String,
    pub audio_bitrate: u32,
    pub encoder: String,
    pub framerate: f64,
    pub width: u32,
    pub height: u32,
}

// ============================================================================
// Server configuration
// ============================================================================

/// Server configuration snapshot.
///
/// Only ever changed locally through
/// [`ServerContext::set_config_field`](crate::context::ServerContext::set_config_field)
/// after the backend has acknowledged the corresponding update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub instance_details: InstanceDetails,
    pub ffmpeg_path: String,
    pub stream_key: String,
    pub web_server_port: u16,
    pub rtmp_server_port: u16,
    pub s3: S3Config,
    pub video_settings: VideoSettings,
    pub yp: DirectoryConfig,
}

impl ServerConfig {
    /// True until the first successful config fetch has landed.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceDetails {
    pub name: String,
    pub title: String,
    pub summary: String,
    pub logo: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub version: String,
    pub nsfw: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub social_handles: Vec<SocialHandle>,
    pub extra_page_content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialHandle {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct S3Config {
    pub enabled: bool,
    pub endpoint: Option<String>,
    pub serving_endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret: Option<String>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub acl: Option<String>,
}

/// Public directory ("YP") registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectoryConfig {
    pub enabled: bool,
    #[serde(rename = "instanceURL")]
    pub instance_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoSettings {
    #[serde(deserialize_with = "null_as_default")]
    pub video_quality_variants: Vec<VideoVariant>,
    pub segment_length_seconds: u32,
    pub number_of_playlist_items: u32,
}

/// One output rendition. A zero bitrate or framerate means "same as source".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoVariant {
    pub audio_passthrough: bool,
    pub video_passthrough: bool,
    pub video_bitrate: u32,
    pub audio_bitrate: u32,
    pub framerate: u32,
    pub encoder_preset: String,
}

// ============================================================================
// Chat
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub body: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(rename = "type", default)]
    pub kind: String,
}

fn default_visible() -> bool {
    true
}

/// Body of a visibility change request; a single toggle sends one id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRequest {
    pub visible: bool,
    pub id_array: Vec<String>,
}

/// Acknowledgement returned by every POST endpoint.
///
/// `success` is required so that an arbitrary JSON error body is not taken
/// for a rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

impl UpdateResponse {
    /// Visibility changes are only confirmed by the literal "changed".
    pub fn is_changed(&self) -> bool {
        self.success && self.message == "changed"
    }
}

// ============================================================================
// Logs
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    #[serde(other)]
    Other,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Other => "other",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!(
                "Invalid log level: {}. Use: trace, debug, info, warning, error",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    #[serde(default)]
    pub message: String,
    pub time: DateTime<Utc>,
}

/// Which log stream to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogScope {
    All,
    Warnings,
}

// ============================================================================
// Upgrade check
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Release {
    pub name: String,
    pub html_url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub body: String,
    #[serde(deserialize_with = "null_as_default")]
    pub assets: Vec<Asset>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Asset {
    pub id: u64,
    pub name: String,
    pub size: u64,
    pub browser_download_url: String,
}

// ============================================================================
// Charts
// ============================================================================

/// A single sample of a time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedValue {
    pub time: DateTime<Utc>,
    pub value: f64,
}
