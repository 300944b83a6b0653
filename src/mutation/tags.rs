//! Instance tag editor.

use super::{submit_config_update, ConfigUpdate, MutationError, MutationSite};
use crate::api::AdminApi;
use crate::context::ServerContext;
use std::sync::Arc;
use std::time::Duration;

pub const EMPTY_TAG: &str = "Please enter a tag";
pub const DUPLICATE_TAG: &str = "This tag is already used!";

const API_PATH: &str = "tags";
const CONFIG_PATH: &str = "instanceDetails";
const FIELD: &str = "tags";
const SUCCESS: &str = "Tags updated.";

/// Adds and removes instance tags. Every change resubmits the full list.
pub struct TagEditor {
    api: Arc<dyn AdminApi>,
    context: ServerContext,
    site: MutationSite,
}

impl TagEditor {
    pub fn new(api: Arc<dyn AdminApi>, context: ServerContext, reset_after: Duration) -> Self {
        Self {
            api,
            context,
            site: MutationSite::new(reset_after),
        }
    }

    pub fn tags(&self) -> Vec<String> {
        self.context.config().instance_details.tags
    }

    pub fn site(&self) -> &MutationSite {
        &self.site
    }

    /// Append a tag. Input is trimmed; blank and case-insensitive duplicates
    /// are refused without a request.
    pub async fn add_tag(&self, input: &str) -> Result<String, MutationError> {
        let tag = input.trim();
        if tag.is_empty() {
            return Err(self.site.reject(MutationError::Invalid(EMPTY_TAG.to_string())));
        }

        let mut tags = self.tags();
        if tags.iter().any(|t| t.to_lowercase() == tag.to_lowercase()) {
            return Err(self.site.reject(MutationError::Invalid(DUPLICATE_TAG.to_string())));
        }

        tags.push(tag.to_string());
        self.submit(tags).await
    }

    /// Remove the tag at `index` (zero-based).
    pub async fn remove_tag(&self, index: usize) -> Result<String, MutationError> {
        let mut tags = self.tags();
        if index >= tags.len() {
            return Err(self.site.reject(MutationError::OutOfRange {
                index,
                len: tags.len(),
            }));
        }

        tags.remove(index);
        self.submit(tags).await
    }

    async fn submit(&self, tags: Vec<String>) -> Result<String, MutationError> {
        submit_config_update(
            self.api.as_ref(),
            &self.context,
            &self.site,
            ConfigUpdate {
                api_path: API_PATH,
                config_path: CONFIG_PATH,
                field: FIELD,
                value: serde_json::json!(tags),
                success_message: SUCCESS.to_string(),
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{ack, Call, FakeApi};
    use crate::api::{ApiError, ServerConfig};
    use crate::mutation::MutationPhase;
    use serde_json::json;
    use tokio::time::sleep;

    const RESET: Duration = Duration::from_millis(3000);

    fn editor_with_tags(tags: &[&str]) -> (Arc<FakeApi>, TagEditor) {
        let api = Arc::new(FakeApi::default());
        let context = ServerContext::new();
        let mut config = ServerConfig::default();
        config.instance_details.name = "Stream".to_string();
        config.instance_details.tags = tags.iter().map(|t| t.to_string()).collect();
        context.replace_config(config);
        let editor = TagEditor::new(api.clone(), context, RESET);
        (api, editor)
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_tag_posts_full_list_and_merges() {
        let (api, editor) = editor_with_tags(&["music", "chill"]);

        let message = editor.add_tag("  gaming ").await.unwrap();

        assert_eq!(message, "Tags updated.");
        assert_eq!(
            api.calls(),
            vec![Call::UpdateConfig {
                api_path: "tags".to_string(),
                value: json!(["music", "chill", "gaming"]),
            }]
        );
        assert_eq!(editor.tags(), vec!["music", "chill", "gaming"]);
        assert_eq!(editor.site().status().phase, MutationPhase::Succeeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_tag_is_case_insensitive() {
        let (api, editor) = editor_with_tags(&["Music"]);

        let result = editor.add_tag("music").await;

        assert_eq!(result, Err(MutationError::Invalid(DUPLICATE_TAG.to_string())));
        assert!(api.calls().is_empty());
        assert_eq!(editor.site().status().message.as_deref(), Some(DUPLICATE_TAG));
        assert_eq!(editor.site().status().phase, MutationPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_tag_is_refused() {
        let (api, editor) = editor_with_tags(&["music"]);

        let result = editor.add_tag("   ").await;

        assert_eq!(result, Err(MutationError::Invalid(EMPTY_TAG.to_string())));
        assert!(api.calls().is_empty());
        assert_eq!(editor.tags(), vec!["music"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_update_leaves_tags_and_shows_message() {
        let (api, editor) = editor_with_tags(&["music"]);
        *api.update_response.lock().unwrap() = Ok(ack(false, "tags are locked"));

        let result = editor.add_tag("news").await;

        assert_eq!(result, Err(MutationError::Rejected("tags are locked".to_string())));
        assert_eq!(editor.tags(), vec!["music"]);
        let status = editor.site().status();
        assert_eq!(status.phase, MutationPhase::Failed);
        assert_eq!(status.message.as_deref(), Some("tags are locked"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_leaves_tags() {
        let (api, editor) = editor_with_tags(&["music"]);
        *api.update_response.lock().unwrap() = Err(ApiError::Timeout(10_000));

        let result = editor.add_tag("news").await;

        assert!(matches!(result, Err(MutationError::Transport(_))));
        assert_eq!(editor.tags(), vec!["music"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_tag_by_index() {
        let (api, editor) = editor_with_tags(&["a", "b", "c"]);

        editor.remove_tag(1).await.unwrap();

        assert_eq!(
            api.calls(),
            vec![Call::UpdateConfig {
                api_path: "tags".to_string(),
                value: json!(["a", "c"]),
            }]
        );
        assert_eq!(editor.tags(), vec!["a", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_tag_out_of_range() {
        let (api, editor) = editor_with_tags(&["a"]);

        let result = editor.remove_tag(3).await;

        assert_eq!(result, Err(MutationError::OutOfRange { index: 3, len: 1 }));
        assert!(api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_message_clears_after_timeout() {
        let (_api, editor) = editor_with_tags(&[]);

        editor.add_tag("first").await.unwrap();
        assert_eq!(editor.site().status().message.as_deref(), Some("Tags updated."));

        sleep(RESET + Duration::from_millis(1)).await;
        assert_eq!(editor.site().status().phase, MutationPhase::Idle);
        assert!(editor.site().status().message.is_none());
        assert_eq!(editor.tags(), vec!["first"]);
    }
}
