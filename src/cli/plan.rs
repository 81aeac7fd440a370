use std::{fmt::Display, io::Write};

use anyhow::Result;
use chrono::NaiveDate;
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};
use tracing::info;

use crate::store::{
    activity_store::{ActivityStore, Collection},
    entities::Task,
};

use super::{
    Args,
    context::Context,
    output::{format_plan, success, warning},
    prompt::{Prompt, is_yes},
};

/// A daily plan holds the top priorities of the day, not a backlog.
pub const MAX_TASKS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

/// `plan`: lists plans from today onwards.
pub async fn list_plans<S: ActivityStore, P: Prompt, W: Write>(
    ctx: &mut Context<S, P, W>,
) -> Result<()> {
    let plans = ctx.plans().await?;
    let upcoming = plans.upcoming(ctx.today());
    if upcoming.is_empty() {
        return ctx.say("No upcoming plans. Use 'plan today' to create one.");
    }
    for plan in upcoming {
        ctx.say(format_plan(plan))?;
    }
    Ok(())
}

/// `plan today`: creates, edits or displays today's plan.
pub async fn plan_today<S: ActivityStore, P: Prompt, W: Write>(
    ctx: &mut Context<S, P, W>,
    edit: bool,
    view: bool,
) -> Result<()> {
    let today = ctx.today();
    let mut plans = ctx.plans().await?;

    if view {
        return match plans.get(today) {
            Some(plan) => ctx.say(format_plan(plan)),
            None => ctx.say("No plan for today."),
        };
    }

    if plans.get(today).is_some() && !edit {
        return ctx.say(warning(
            "Plan for today already exists. Use --edit to modify or --view to see it.",
        ));
    }

    ctx.say(format!(
        "Let's set your top {MAX_TASKS} tasks for today. Use #tag for optional tags (e.g., Workout #health)"
    ))?;
    let mut tasks = Vec::with_capacity(MAX_TASKS);
    for i in 1..=MAX_TASKS {
        let raw = ctx.prompt.ask(&format!("Task {i}: ")).await?;
        tasks.extend(Task::from_input(&raw));
    }

    info!("Saving plan for {today} with {} tasks", tasks.len());
    plans.upsert(today, tasks);
    ctx.store.save(Collection::Plans, &plans).await?;
    ctx.say(success("Today's plan saved."))
}

/// `plan show`: displays the plan of an arbitrary day described in natural language.
pub async fn show_plan<S: ActivityStore, P: Prompt, W: Write>(
    ctx: &mut Context<S, P, W>,
    date: &str,
    date_style: DateStyle,
) -> Result<()> {
    let date = parse_day(date, ctx.now().date(), date_style)?;
    let plans = ctx.plans().await?;
    match plans.get(date) {
        Some(plan) => ctx.say(format_plan(plan)),
        None => ctx.say(format!("No plan for {date}.")),
    }
}

fn parse_day(value: &str, today: NaiveDate, date_style: DateStyle) -> Result<NaiveDate> {
    // Relative expressions are resolved against the local clock, so the offset itself is
    // irrelevant and UTC is as good as any.
    let now = today.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc();
    match parse_date_string(value, now, date_style.into()) {
        Ok(v) => Ok(v.date_naive()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {value:?}: {e}"),
            )
            .into()),
    }
}

/// `checkin`: asks about every task of today's plan and records the answers.
pub async fn checkin<S: ActivityStore, P: Prompt, W: Write>(
    ctx: &mut Context<S, P, W>,
) -> Result<()> {
    let today = ctx.today();
    let mut plans = ctx.plans().await?;

    let descriptions = match plans.get(today) {
        Some(plan) if !plan.tasks.is_empty() => plan
            .tasks
            .iter()
            .map(|v| v.description.clone())
            .collect::<Vec<_>>(),
        Some(_) | None => {
            return ctx.say(warning(
                "No plan found for today. Use 'plan today' to create one.",
            ));
        }
    };

    let mut answers = Vec::with_capacity(descriptions.len());
    for description in descriptions {
        let answer = ctx
            .prompt
            .ask(&format!("Did you complete '{description}'? (y/n): "))
            .await?;
        answers.push(is_yes(&answer));
    }

    plans.mark_done(today, &answers);
    ctx.store.save(Collection::Plans, &plans).await?;
    info!("Checked in {answers:?} for {today}");

    if answers.iter().all(|v| *v) {
        ctx.say(success("All tasks complete! Streak updated."))
    } else {
        ctx.say(warning("Not all tasks complete. Keep going!"))
    }
}
