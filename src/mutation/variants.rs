//! Video output variant editor.

use super::{submit_config_update, ConfigUpdate, MutationError, MutationSite};
use crate::api::{AdminApi, VideoVariant};
use crate::context::ServerContext;
use std::sync::Arc;
use std::time::Duration;

const API_PATH: &str = "video/streamoutputvariants";
const CONFIG_PATH: &str = "videoSettings";
const FIELD: &str = "videoQualityVariants";
const SUCCESS: &str = "Variants updated.";

/// Partial change to a variant; `None` keeps the existing value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantPatch {
    pub video_bitrate: Option<u32>,
    pub audio_bitrate: Option<u32>,
    pub framerate: Option<u32>,
    pub encoder_preset: Option<String>,
    pub video_passthrough: Option<bool>,
    pub audio_passthrough: Option<bool>,
}

impl VariantPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, base: &VideoVariant) -> VideoVariant {
        VideoVariant {
            video_bitrate: self.video_bitrate.unwrap_or(base.video_bitrate),
            audio_bitrate: self.audio_bitrate.unwrap_or(base.audio_bitrate),
            framerate: self.framerate.unwrap_or(base.framerate),
            encoder_preset: self
                .encoder_preset
                .clone()
                .unwrap_or_else(|| base.encoder_preset.clone()),
            video_passthrough: self.video_passthrough.unwrap_or(base.video_passthrough),
            audio_passthrough: self.audio_passthrough.unwrap_or(base.audio_passthrough),
        }
    }
}

/// Edits the list of output variants. Any change resubmits the whole list.
pub struct VariantEditor {
    api: Arc<dyn AdminApi>,
    context: ServerContext,
    site: MutationSite,
}

impl VariantEditor {
    pub fn new(api: Arc<dyn AdminApi>, context: ServerContext, reset_after: Duration) -> Self {
        Self {
            api,
            context,
            site: MutationSite::new(reset_after),
        }
    }

    /// Starting point for a new variant.
    pub fn template() -> VideoVariant {
        VideoVariant {
            audio_passthrough: true,
            video_passthrough: false,
            video_bitrate: 800,
            audio_bitrate: 0,
            framerate: 24,
            encoder_preset: "veryfast".to_string(),
        }
    }

    pub fn variants(&self) -> Vec<VideoVariant> {
        self.context.config().video_settings.video_quality_variants
    }

    pub fn site(&self) -> &MutationSite {
        &self.site
    }

    /// Replace the variant at `index` (zero-based), keeping the others as
    /// they are.
    pub async fn edit_variant(
        &self,
        index: usize,
        variant: VideoVariant,
    ) -> Result<String, MutationError> {
        let mut variants = self.variants();
        match variants.get_mut(index) {
            Some(slot) => *slot = variant,
            None => {
                return Err(self.site.reject(MutationError::OutOfRange {
                    index,
                    len: variants.len(),
                }))
            }
        }
        self.submit(variants).await
    }

    pub async fn add_variant(&self, variant: VideoVariant) -> Result<String, MutationError> {
        let mut variants = self.variants();
        variants.push(variant);
        self.submit(variants).await
    }

    async fn submit(&self, variants: Vec<VideoVariant>) -> Result<String, MutationError> {
        let value = serde_json::to_value(&variants)
            .map_err(|e| self.site.reject(MutationError::Invalid(e.to_string())))?;

        submit_config_update(
            self.api.as_ref(),
            &self.context,
            &self.site,
            ConfigUpdate {
                api_path: API_PATH,
                config_path: CONFIG_PATH,
                field: FIELD,
                value,
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
    use crate::api::ServerConfig;
    use crate::mutation::MutationPhase;

    fn variant(bitrate: u32) -> VideoVariant {
        VideoVariant {
            video_bitrate: bitrate,
            framerate: 30,
            encoder_preset: "veryfast".to_string(),
            ..VideoVariant::default()
        }
    }

    fn editor_with(variants: Vec<VideoVariant>) -> (Arc<FakeApi>, VariantEditor) {
        let api = Arc::new(FakeApi::default());
        let context = ServerContext::new();
        let mut config = ServerConfig::default();
        config.video_settings.video_quality_variants = variants;
        config.video_settings.segment_length_seconds = 4;
        context.replace_config(config);
        let editor = VariantEditor::new(api.clone(), context, Duration::from_millis(3000));
        (api, editor)
    }

    fn submitted(api: &FakeApi) -> Vec<VideoVariant> {
        match api.calls().as_slice() {
            [Call::UpdateConfig { api_path, value }] => {
                assert_eq!(api_path, "video/streamoutputvariants");
                serde_json::from_value(value.clone()).unwrap()
            }
            other => panic!("expected one config update, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_middle_variant_resubmits_whole_list() {
        let original = vec![variant(500), variant(1200), variant(3000)];
        let (api, editor) = editor_with(original.clone());
        let changed = VideoVariant {
            framerate: 60,
            ..variant(2500)
        };

        let message = editor.edit_variant(1, changed.clone()).await.unwrap();
        assert_eq!(message, "Variants updated.");

        let sent = submitted(&api);
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0], original[0]);
        assert_eq!(sent[1], changed);
        assert_eq!(sent[2], original[2]);
        assert_eq!(editor.variants(), sent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_variant_appends() {
        let (api, editor) = editor_with(vec![variant(500)]);

        editor.add_variant(VariantEditor::template()).await.unwrap();

        let sent = submitted(&api);
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1], VariantEditor::template());
        assert_eq!(editor.variants().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_edit_leaves_variants_identical() {
        let original = vec![variant(500), variant(1200)];
        let (api, editor) = editor_with(original.clone());
        *api.update_response.lock().unwrap() = Ok(ack(false, "invalid framerate"));

        let result = editor.edit_variant(0, variant(9999)).await;

        assert_eq!(result, Err(MutationError::Rejected("invalid framerate".to_string())));
        assert_eq!(editor.variants(), original);
        assert_eq!(editor.site().status().phase, MutationPhase::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_out_of_range_sends_nothing() {
        let (api, editor) = editor_with(vec![variant(500)]);

        let result = editor.edit_variant(4, variant(800)).await;

        assert_eq!(result, Err(MutationError::OutOfRange { index: 4, len: 1 }));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_patch_keeps_unset_fields() {
        let base = variant(1200);
        let patch = VariantPatch {
            framerate: Some(60),
            video_passthrough: Some(true),
            ..VariantPatch::default()
        };

        let patched = patch.apply(&base);
        assert_eq!(patched.video_bitrate, 1200);
        assert_eq!(patched.framerate, 60);
        assert!(patched.video_passthrough);
        assert_eq!(patched.encoder_preset, "veryfast");
        assert!(VariantPatch::default().is_empty());
    }
}
