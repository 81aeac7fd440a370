use std::io::Write;

use anyhow::Result;
use chrono::Timelike;
use tracing::info;

use crate::store::{
    activity_store::{ActivityStore, Collection},
    entities::JournalEntry,
};

use super::{
    context::Context,
    output::{success, warning},
    prompt::Prompt,
};

/// `journal`: appends an entry, asking for the text when it wasn't given on the command line.
pub async fn write_journal<S: ActivityStore, P: Prompt, W: Write>(
    ctx: &mut Context<S, P, W>,
    text: Option<String>,
) -> Result<()> {
    let text = match text.filter(|v| !v.trim().is_empty()) {
        Some(text) => text,
        None => ctx.prompt.ask("What's on your mind today?\n> ").await?,
    };
    let text = text.trim();
    if text.is_empty() {
        return ctx.say(warning("Nothing to save."));
    }

    let now = ctx.now();
    let mut journal = ctx.journal().await?;
    journal.push(JournalEntry {
        timestamp: now.with_nanosecond(0).unwrap_or(now),
        text: text.to_string(),
    });
    ctx.store.save(Collection::Journal, &journal).await?;
    info!("Journal now has {} entries", journal.entries().len());

    ctx.say(success("Journal entry saved."))
}
