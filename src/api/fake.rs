//! In-memory [`AdminApi`] for unit tests.

use super::{
    AdminApi, ApiError, ChatMessage, LogEntry, LogScope, Release, ServerConfig, ServerStatus,
    UpdateResponse, VisibilityRequest,
};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// A recorded API call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Status,
    ServerConfig,
    UpdateConfig {
        api_path: String,
        value: serde_json::Value,
    },
    ChatHistory,
    Visibility(VisibilityRequest),
    Logs(LogScope),
    Release,
}

pub(crate) struct FakeApi {
    pub status: Mutex<Result<ServerStatus, ApiError>>,
    pub config: Mutex<Result<ServerConfig, ApiError>>,
    pub chat: Mutex<Result<Vec<ChatMessage>, ApiError>>,
    pub update_response: Mutex<Result<UpdateResponse, ApiError>>,
    pub visibility_response: Mutex<Result<UpdateResponse, ApiError>>,
    pub logs: Mutex<Vec<LogEntry>>,
    pub release: Mutex<Release>,
    /// Applied before every response.
    pub delay: Mutex<Option<Duration>>,
    pub calls: Mutex<Vec<Call>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            status: Mutex::new(Ok(ServerStatus::default())),
            config: Mutex::new(Ok(ServerConfig::default())),
            chat: Mutex::new(Ok(Vec::new())),
            update_response: Mutex::new(Ok(ack(true, "updated"))),
            visibility_response: Mutex::new(Ok(ack(true, "changed"))),
            logs: Mutex::new(Vec::new()),
            release: Mutex::new(Release::default()),
            delay: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }
}

pub(crate) fn ack(success: bool, message: &str) -> UpdateResponse {
    UpdateResponse {
        success,
        message: message.to_string(),
    }
}

impl FakeApi {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matcher: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matcher(c)).count()
    }

    async fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl AdminApi for FakeApi {
    async fn status(&self) -> Result<ServerStatus, ApiError> {
        self.record(Call::Status).await;
        self.status.lock().unwrap().clone()
    }

    async fn server_config(&self) -> Result<ServerConfig, ApiError> {
        self.record(Call::ServerConfig).await;
        self.config.lock().unwrap().clone()
    }

    async fn update_config(
        &self,
        api_path: &str,
        value: serde_json::Value,
    ) -> Result<UpdateResponse, ApiError> {
        self.record(Call::UpdateConfig {
            api_path: api_path.to_string(),
            value,
        })
        .await;
        self.update_response.lock().unwrap().clone()
    }

    async fn chat_history(&self) -> Result<Vec<ChatMessage>, ApiError> {
        self.record(Call::ChatHistory).await;
        self.chat.lock().unwrap().clone()
    }

    async fn set_message_visibility(
        &self,
        request: &VisibilityRequest,
    ) -> Result<UpdateResponse, ApiError> {
        self.record(Call::Visibility(request.clone())).await;
        self.visibility_response.lock().unwrap().clone()
    }

    async fn logs(&self, scope: LogScope) -> Result<Vec<LogEntry>, ApiError> {
        self.record(Call::Logs(scope)).await;
        Ok(self.logs.lock().unwrap().clone())
    }

    async fn latest_release(&self) -> Result<Release, ApiError> {
        self.record(Call::Release).await;
        Ok(self.release.lock().unwrap().clone())
    }
}
