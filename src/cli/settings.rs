//! Config editing commands: tags, variants and single fields.

use crate::api::AdminApi;
use crate::cli::output::{format_outcome, to_json};
use crate::cli::{SetArgs, TagsCommands, VariantArgs, VariantsCommands};
use crate::context::ServerContext;
use crate::mutation::{FieldEditor, MutationError, MutationSite, TagEditor, VariantEditor, VariantPatch};
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;

/// A context seeded with the server's current config.
async fn load_context(api: &dyn AdminApi) -> anyhow::Result<ServerContext> {
    let context = ServerContext::new();
    context.replace_config(api.server_config().await?);
    Ok(context)
}

/// Convert a one-based number from the command line.
fn zero_based(number: usize, what: &str) -> anyhow::Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("{} numbers start at 1", what))
}

/// Restate out-of-range errors with the numbers the user typed.
fn one_based_error(error: MutationError, what: &str) -> anyhow::Error {
    match error {
        MutationError::OutOfRange { index, len } => {
            anyhow::anyhow!("No {} number {} (there are {})", what, index + 1, len)
        }
        other => other.into(),
    }
}

fn outcome(site: &MutationSite) -> String {
    format_outcome(&site.status())
}

/// Handle `castctl tags ...`
pub async fn handle_tags(
    api: Arc<dyn AdminApi>,
    command: &TagsCommands,
    reset_after: Duration,
) -> anyhow::Result<String> {
    let context = load_context(api.as_ref()).await?;
    let editor = TagEditor::new(api, context, reset_after);

    match command {
        TagsCommands::List(args) => {
            let tags = editor.tags();
            if args.json {
                return to_json(&tags);
            }
            if tags.is_empty() {
                return Ok("No tags.".to_string());
            }
            let mut output = String::new();
            for (index, tag) in tags.iter().enumerate() {
                writeln!(output, "{:>3}. {}", index + 1, tag).unwrap();
            }
            Ok(output.trim_end().to_string())
        }
        TagsCommands::Add(args) => {
            editor.add_tag(&args.tag).await?;
            Ok(outcome(editor.site()))
        }
        TagsCommands::Remove(args) => {
            let index = zero_based(args.index, "Tag")?;
            editor
                .remove_tag(index)
                .await
                .map_err(|e| one_based_error(e, "tag"))?;
            Ok(outcome(editor.site()))
        }
    }
}

impl From<&VariantArgs> for VariantPatch {
    fn from(args: &VariantArgs) -> Self {
        Self {
            video_bitrate: args.video_bitrate,
            audio_bitrate: args.audio_bitrate,
            framerate: args.framerate,
            encoder_preset: args.preset.clone(),
            video_passthrough: args.video_passthrough,
            audio_passthrough: args.audio_passthrough,
        }
    }
}

/// Handle `castctl variants ...`
pub async fn handle_variants(
    api: Arc<dyn AdminApi>,
    command: &VariantsCommands,
    reset_after: Duration,
) -> anyhow::Result<String> {
    let context = load_context(api.as_ref()).await?;
    let editor = VariantEditor::new(api, context, reset_after);

    match command {
        VariantsCommands::Add(args) => {
            let variant = VariantPatch::from(args).apply(&VariantEditor::template());
            editor.add_variant(variant).await?;
        }
        VariantsCommands::Edit(args) => {
            let patch = VariantPatch::from(&args.variant);
            if patch.is_empty() {
                anyhow::bail!("Nothing to change; pass at least one variant option");
            }
            let index = zero_based(args.index, "Variant")?;
            let variants = editor.variants();
            let Some(current) = variants.get(index) else {
                return Err(one_based_error(
                    MutationError::OutOfRange {
                        index,
                        len: variants.len(),
                    },
                    "variant",
                ));
            };
            editor
                .edit_variant(index, patch.apply(current))
                .await
                .map_err(|e| one_based_error(e, "variant"))?;
        }
    }

    Ok(outcome(editor.site()))
}

/// Handle `castctl set <FIELD> <VALUE>`
pub async fn handle_set(
    api: Arc<dyn AdminApi>,
    args: &SetArgs,
    reset_after: Duration,
) -> anyhow::Result<String> {
    let context = load_context(api.as_ref()).await?;
    let previous = args.field.current(&context.config());
    let editor = FieldEditor::new(api, context, reset_after);

    editor.set(args.field, &args.value).await?;
    tracing::debug!(field = %args.field, previous = %previous, "Field changed");
    Ok(outcome(editor.site()))
}
