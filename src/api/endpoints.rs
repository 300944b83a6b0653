//! Named admin API endpoints.

use super::types::LogScope;

/// Prefix for every config update path.
pub const CONFIG_UPDATE_PREFIX: &str = "/api/admin/config/";

/// Fixed set of admin endpoints. All of them require admin credentials; the
/// release check goes to a separate, unauthenticated URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Status,
    ServerConfig,
    ChatHistory,
    ChatVisibility,
    Logs(LogScope),
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Status => "/api/admin/status",
            Endpoint::ServerConfig => "/api/admin/serverconfig",
            Endpoint::ChatHistory => "/api/admin/chat/messages",
            Endpoint::ChatVisibility => "/api/admin/chat/updatemessagevisibility",
            Endpoint::Logs(LogScope::All) => "/api/admin/logs",
            Endpoint::Logs(LogScope::Warnings) => "/api/admin/logs/warnings",
        }
    }
}

/// Path for a config field update, e.g. `tags` -> `/api/admin/config/tags`.
pub fn config_update_path(api_path: &str) -> String {
    format!(
        "{}{}",
        CONFIG_UPDATE_PREFIX,
        api_path.trim_start_matches('/')
    )
}
