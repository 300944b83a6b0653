//! Chat command handlers

use crate::api::{AdminApi, ChatMessage};
use crate::cli::output::{format_outcome, format_page_footer, to_json};
use crate::cli::{ChatBulkArgs, ChatCommands, ChatListArgs, ChatToggleArgs};
use crate::mutation::{BulkAction, ChatModeration};
use crate::views::chat::{chat_view, render_chat_table, ChatRowView};
use std::sync::Arc;
use std::time::Duration;

/// Handle `castctl chat ...`
pub async fn handle_chat(
    api: Arc<dyn AdminApi>,
    command: &ChatCommands,
    reset_after: Duration,
) -> anyhow::Result<String> {
    let moderation = ChatModeration::new(api, reset_after);
    moderation.refresh().await?;

    match command {
        ChatCommands::List(args) => list(&moderation, args),
        ChatCommands::Show(args) => bulk(&moderation, args, BulkAction::Show).await,
        ChatCommands::Hide(args) => bulk(&moderation, args, BulkAction::Hide).await,
        ChatCommands::Toggle(args) => toggle(&moderation, args).await,
    }
}

fn list(moderation: &ChatModeration, args: &ChatListArgs) -> anyhow::Result<String> {
    let messages = moderation.messages();
    let mut view = chat_view();
    if !args.authors.is_empty() {
        view.set_filter("author", args.authors.clone())?;
    }
    if args.hidden || args.visible {
        view.set_filter("visible", vec![args.visible.to_string()])?;
    }

    let page = view.page(&messages, args.page.max(1) - 1)?;
    let selection = moderation.selection();

    if args.json {
        let rows: Vec<ChatRowView> = page
            .items
            .iter()
            .map(|m| ChatRowView::new(m, selection.contains(&m.id)))
            .collect();
        return to_json(&rows);
    }

    if page.items.is_empty() {
        return Ok("No chat messages.".to_string());
    }

    Ok(format!(
        "{}\n{}",
        render_chat_table(&page.items, &selection),
        format_page_footer(page.page, page.page_count, page.total)
    ))
}

/// Every message id written by one of `authors`.
fn ids_by_authors(messages: &[ChatMessage], authors: &[String]) -> anyhow::Result<Vec<String>> {
    if authors.is_empty() {
        return Ok(Vec::new());
    }
    let mut view = chat_view();
    view.set_filter("author", authors.to_vec())?;
    Ok(view.row_keys(messages))
}

async fn bulk(
    moderation: &ChatModeration,
    args: &ChatBulkArgs,
    action: BulkAction,
) -> anyhow::Result<String> {
    for id in &args.ids {
        moderation.select(id)?;
    }
    for id in ids_by_authors(&moderation.messages(), &args.authors)? {
        moderation.select(&id)?;
    }

    moderation.submit_bulk(action).await?;
    Ok(format_outcome(&moderation.bulk_status()))
}

async fn toggle(moderation: &ChatModeration, args: &ChatToggleArgs) -> anyhow::Result<String> {
    moderation.toggle_visibility(&args.id).await?;
    match moderation.toggle_status(&args.id) {
        Some(status) => Ok(format_outcome(&status)),
        None => Ok(String::new()),
    }
}
