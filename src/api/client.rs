//! HTTP implementation of [`AdminApi`].

use super::endpoints::{config_update_path, Endpoint};
use super::{
    AdminApi, ApiError, ChatMessage, LogEntry, LogScope, Release, ServerConfig, ServerStatus,
    UpdateResponse, VisibilityRequest,
};
use crate::config::ConnectionConfig;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Admin API client with connection pooling and basic auth.
#[derive(Clone)]
pub struct AdminClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
    release_url: String,
    timeout_ms: u64,
}

impl AdminClient {
    /// Build a client from connection settings.
    pub fn new(config: &ConnectionConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("castctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        Ok(Self::with_client(config, client))
    }

    /// Build a client around an existing reqwest client (for testing).
    pub fn with_client(config: &ConnectionConfig, client: Client) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            release_url: config.release_url.clone(),
            timeout_ms: config.request_timeout_seconds * 1000,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.username, Some(&self.password))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        request
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.timeout_ms))
    }

    async fn read_body(&self, response: Response) -> Result<String, ApiError> {
        response.text().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to read response body: {}", e))
        })
    }

    /// GET a JSON document, mapping non-success statuses to `Upstream`.
    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let status = response.status();
        let body = self.read_body(response).await?;

        if !status.is_success() {
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&body, status),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    async fn get_endpoint<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ApiError> {
        let request = self.authed(self.client.get(self.url(endpoint.path())));
        self.get_json(request).await
    }

    /// POST a JSON body and decode the `{success, message}` acknowledgement.
    ///
    /// Error statuses that still carry a well-formed acknowledgement are
    /// returned as `Ok` so callers see the server's own message.
    async fn post_update<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<UpdateResponse, ApiError> {
        let request = self.authed(self.client.post(self.url(path)).json(body));
        let response = self.send(request).await?;
        let status = response.status();
        let text = self.read_body(response).await?;

        match serde_json::from_str::<UpdateResponse>(&text) {
            Ok(ack) => {
                if !status.is_success() {
                    tracing::debug!(
                        path = path,
                        status = status.as_u16(),
                        message = %ack.message,
                        "Update rejected by server"
                    );
                }
                Ok(ack)
            }
            Err(_) if !status.is_success() => Err(ApiError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&text, status),
            }),
            Err(e) => Err(ApiError::InvalidResponse(format!(
                "Failed to parse update response: {}",
                e
            ))),
        }
    }
}

fn upstream_message(body: &str, status: reqwest::StatusCode) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

/// Chat history may come back as `null` or `{}` when there is nothing yet.
fn decode_chat_history(value: serde_json::Value) -> Result<Vec<ChatMessage>, ApiError> {
    match value {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Object(ref map) if map.is_empty() => Ok(Vec::new()),
        other => serde_json::from_value(other).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse chat history: {}", e))
        }),
    }
}

#[async_trait]
impl AdminApi for AdminClient {
    async fn status(&self) -> Result<ServerStatus, ApiError> {
        self.get_endpoint(Endpoint::Status).await
    }

    async fn server_config(&self) -> Result<ServerConfig, ApiError> {
        self.get_endpoint(Endpoint::ServerConfig).await
    }

    async fn update_config(
        &self,
        api_path: &str,
        value: serde_json::Value,
    ) -> Result<UpdateResponse, ApiError> {
        let path = config_update_path(api_path);
        tracing::debug!(path = %path, "Posting config update");
        self.post_update(&path, &serde_json::json!({ "value": value }))
            .await
    }

    async fn chat_history(&self) -> Result<Vec<ChatMessage>, ApiError> {
        let value: serde_json::Value = self.get_endpoint(Endpoint::ChatHistory).await?;
        decode_chat_history(value)
    }

    async fn set_message_visibility(
        &self,
        request: &VisibilityRequest,
    ) -> Result<UpdateResponse, ApiError> {
        tracing::debug!(
            visible = request.visible,
            count = request.id_array.len(),
            "Posting chat visibility change"
        );
        self.post_update(Endpoint::ChatVisibility.path(), request)
            .await
    }

    async fn logs(&self, scope: LogScope) -> Result<Vec<LogEntry>, ApiError> {
        let value: serde_json::Value = self.get_endpoint(Endpoint::Logs(scope)).await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(value)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse logs: {}", e)))
    }

    async fn latest_release(&self) -> Result<Release, ApiError> {
        self.get_json(self.client.get(&self.release_url)).await
    }
}
