use std::io::Write;

use anyhow::Result;

use crate::{
    store::activity_store::{ActivityStore, Collection},
    tracker::{
        status::{habit_streaks, review_day, weekly_status},
        summary::weekly_summary,
    },
};

use super::{
    context::Context,
    output::{
        format_habit_streaks, format_reminders, format_status_report, format_streak,
        format_summary, success,
    },
    prompt::Prompt,
};

pub async fn show_streak<S: ActivityStore, P: Prompt, W: Write>(
    ctx: &mut Context<S, P, W>,
) -> Result<()> {
    let streak = ctx.current_streak().await?;
    ctx.say(format_streak(streak))
}

pub async fn summary_week<S: ActivityStore, P: Prompt, W: Write>(
    ctx: &mut Context<S, P, W>,
) -> Result<()> {
    let plans = ctx.plans().await?;
    let summary = weekly_summary(&plans, ctx.today());
    ctx.say(format_summary(&summary))
}

pub async fn show_reminders<S: ActivityStore, P: Prompt, W: Write>(
    ctx: &mut Context<S, P, W>,
) -> Result<()> {
    let reminders = ctx.reminders().await?;
    ctx.say(format_reminders(&reminders))
}

/// `review`: records today's status flags.
pub async fn review<S: ActivityStore, P: Prompt, W: Write>(
    ctx: &mut Context<S, P, W>,
) -> Result<()> {
    let today = ctx.today();
    let journal = ctx.journal().await?;
    let plans = ctx.plans().await?;
    let mut status = ctx.status().await?;

    let record = review_day(&mut status, &journal, &plans, today);
    ctx.store.save(Collection::Status, &status).await?;

    ctx.say(format!(
        "Review for {today}: journaled {}, planned {}",
        record.journaled, record.planned
    ))?;
    ctx.say(format_habit_streaks(habit_streaks(&status, today)))
}

/// `weekly`: review flags of the last 7 days.
pub async fn weekly<S: ActivityStore, P: Prompt, W: Write>(
    ctx: &mut Context<S, P, W>,
) -> Result<()> {
    let status = ctx.status().await?;
    let report = weekly_status(&status, ctx.today());
    ctx.say(format_status_report(&report))
}

/// `start`: forgets the session snapshot. Records are left untouched and the snapshot is rebuilt
/// from them when the session is saved.
pub async fn start<S: ActivityStore, P: Prompt, W: Write>(
    ctx: &mut Context<S, P, W>,
) -> Result<()> {
    ctx.reset_session();
    ctx.say(success("Session initialized. Your records are untouched."))
}
