//! Mutation flows: submit a change, merge it on success, show a transient
//! outcome.
//!
//! Every editor owns one or more [`MutationSite`]s. A flow always records its
//! outcome on the site before returning, so a caller that only looks at the
//! `Result` and a caller that watches the site see the same thing.

mod chat;
mod error;
mod field;
mod outcome;
mod tags;
mod variants;

pub use chat::{apply_visibility, BulkAction, ChatModeration};
pub use error::MutationError;
pub use field::{ConfigField, FieldEditor};
pub use outcome::{MutationPhase, MutationSite, SiteStatus};
pub use tags::{TagEditor, DUPLICATE_TAG, EMPTY_TAG};
pub use variants::{VariantEditor, VariantPatch};

use crate::api::AdminApi;
use crate::context::ServerContext;

/// One config field change: where to POST it and where to merge it.
#[derive(Debug, Clone)]
pub(crate) struct ConfigUpdate<'a> {
    /// Relative to the config update prefix, e.g. `tags`.
    pub api_path: &'a str,
    /// Dotted path of the containing object in the cached config.
    pub config_path: &'a str,
    pub field: &'a str,
    pub value: serde_json::Value,
    pub success_message: String,
}

/// POST a config change and, once the server confirms it, merge the submitted
/// value into the shared config.
///
/// A confirmed change is `success == true`; anything else leaves the cached
/// config untouched.
pub(crate) async fn submit_config_update(
    api: &dyn AdminApi,
    context: &ServerContext,
    site: &MutationSite,
    update: ConfigUpdate<'_>,
) -> Result<String, MutationError> {
    site.begin()?;

    let response = match api.update_config(update.api_path, update.value.clone()).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(api_path = update.api_path, error = %e, "Config update failed");
            site.fail(e.to_string());
            return Err(e.into());
        }
    };

    if !response.success {
        let message = if response.message.is_empty() {
            "Update was not accepted".to_string()
        } else {
            response.message
        };
        tracing::warn!(api_path = update.api_path, message = %message, "Config update rejected");
        site.fail(message.clone());
        return Err(MutationError::Rejected(message));
    }

    if let Err(e) = context.set_config_field(update.config_path, update.field, update.value) {
        tracing::error!(field = update.field, error = %e, "Confirmed change could not be merged");
        site.fail(e.to_string());
        return Err(e.into());
    }

    tracing::info!(api_path = update.api_path, "Config updated");
    site.succeed(update.success_message.clone());
    Ok(update.success_message)
}
