//! Offline chat history commands: list, show and delete.
//!
//! These work directly on the history file and need no API key.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use parley_core::chat::store::ChatStore;
use parley_infra::config::{history_path, load_app_config};
use parley_infra::filesystem::JsonFileStore;
use parley_types::chat::{Role, format_timestamp};

/// Open the configured history file and load every stored chat.
pub async fn open_store(data_dir: &Path) -> Result<(JsonFileStore, ChatStore)> {
    let config = load_app_config(data_dir).await;
    let file = JsonFileStore::new(history_path(data_dir, &config));
    let store = ChatStore::load(&file)
        .await
        .with_context(|| format!("failed to read chat history from {}", file.path().display()))?;
    Ok((file, store))
}

/// List stored chats as a table, most recently modified first.
pub async fn list_chats(data_dir: &Path, json: bool) -> Result<()> {
    let (_, store) = open_store(data_dir).await?;
    let summaries = store.summaries();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!();
        println!("  {}", style("No stored chats yet.").dim());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Session ID").fg(Color::White),
        Cell::new("Summary").fg(Color::White),
        Cell::new("Turns").fg(Color::White),
        Cell::new("Last Modified").fg(Color::White),
    ]);

    for summary in &summaries {
        let turns = store
            .get(&summary.session_id)
            .map(|c| c.history.len())
            .unwrap_or_default();
        let label = if summary.summary.is_empty() {
            "(in progress)".to_string()
        } else {
            summary.summary.clone()
        };
        table.add_row(vec![
            Cell::new(&summary.session_id).fg(Color::Cyan),
            Cell::new(label),
            Cell::new(turns),
            Cell::new(summary.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("  {} stored chats", style(summaries.len()).bold());
    println!("{table}");
    println!();
    Ok(())
}

/// Print the full history of one stored chat.
pub async fn show_chat(data_dir: &Path, session_id: &str, json: bool) -> Result<()> {
    let (_, store) = open_store(data_dir).await?;
    let chat = store
        .get(session_id)
        .with_context(|| format!("no stored chat with session id '{session_id}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(chat)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style("Chat").bold(),
        style(&chat.session_id).cyan()
    );
    if !chat.summary.is_empty() {
        println!("  {}", style(&chat.summary).bold());
    }
    println!("  {}", style(format_timestamp(&chat.timestamp)).dim());
    println!();

    for message in &chat.history {
        let speaker = match message.role {
            Role::User => style("you  ").green().bold(),
            Role::Model => style("model").magenta().bold(),
        };
        println!("  {speaker} {}", message.text());
    }
    println!();
    Ok(())
}

/// Delete stored chats and save the history file.
///
/// Works on the file directly, so it must not run while a server holds the
/// same history in memory.
pub async fn delete_chats(data_dir: &Path, session_ids: &[String], json: bool) -> Result<()> {
    let (file, mut store) = open_store(data_dir).await?;
    let deleted = store.delete_many(session_ids);
    store
        .save_all(&file)
        .await
        .with_context(|| format!("failed to save chat history to {}", file.path().display()))?;

    let missing: Vec<&String> = session_ids.iter().filter(|id| !deleted.contains(*id)).collect();

    if json {
        let out = serde_json::json!({ "deleted": deleted, "missing": missing });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for id in &deleted {
        println!("  {} Deleted {}", style("✓").green(), style(id).cyan());
    }
    for id in missing {
        println!("  {} No stored chat '{}'", style("✗").red(), id);
    }
    Ok(())
}
