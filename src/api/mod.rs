//! Admin API access layer.
//!
//! The [`AdminApi`] trait is the seam between the console and the streaming
//! server: the polling context, list views and mutation flows only ever talk
//! to `Arc<dyn AdminApi>`. [`AdminClient`] is the HTTP implementation.

use async_trait::async_trait;

mod client;
pub mod endpoints;
pub mod error;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use client::AdminClient;
pub use endpoints::Endpoint;
pub use error::ApiError;
pub use types::{
    Asset, Broadcaster, ChatMessage, DirectoryConfig, InstanceDetails, LogEntry, LogLevel,
    LogScope, Release, S3Config, ServerConfig, ServerStatus, SocialHandle, StreamDetails,
    TimedValue, UpdateResponse, VideoSettings, VideoVariant, VisibilityRequest,
};

/// Operations the console needs from the streaming server.
///
/// # Object Safety
///
/// Designed to be used as `Arc<dyn AdminApi>`; async methods go through
/// `async_trait`.
///
/// # Cancellation Safety
///
/// Dropping a returned future abandons the request. Callers that must not
/// act on a late response race the future against their own cancellation
/// token instead.
#[async_trait]
pub trait AdminApi: Send + Sync + 'static {
    /// Current server status.
    async fn status(&self) -> Result<ServerStatus, ApiError>;

    /// Full server configuration.
    async fn server_config(&self) -> Result<ServerConfig, ApiError>;

    /// Update one config field. `api_path` is relative to the config update
    /// prefix (e.g. `tags`, `video/streamoutputvariants`).
    ///
    /// A backend-reported failure is `Ok` with `success == false`.
    async fn update_config(
        &self,
        api_path: &str,
        value: serde_json::Value,
    ) -> Result<UpdateResponse, ApiError>;

    /// Chat history, oldest first as sent by the server.
    async fn chat_history(&self) -> Result<Vec<ChatMessage>, ApiError>;

    /// Show or hide a batch of chat messages.
    async fn set_message_visibility(
        &self,
        request: &VisibilityRequest,
    ) -> Result<UpdateResponse, ApiError>;

    /// Server logs.
    async fn logs(&self, scope: LogScope) -> Result<Vec<LogEntry>, ApiError>;

    /// Latest published release, for the upgrade page.
    async fn latest_release(&self) -> Result<Release, ApiError>;
}
