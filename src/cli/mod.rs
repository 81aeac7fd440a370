pub mod context;
pub mod journal;
pub mod output;
pub mod plan;
pub mod prompt;
pub mod report;

use std::{io::Write, iter, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use context::Context;
use plan::DateStyle;
use prompt::{Prompt, StdinPrompt};
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    store::activity_store::{ActivityStore, JsonStore},
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, ensure_dir},
        logging::{CLI_PREFIX, enable_logging},
        runtime::single_thread_runtime,
    },
};

#[derive(Parser, Debug)]
#[command(name = "mensa", version, long_about = None)]
#[command(about = "Daily plans, journaling, check-ins and streaks", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
    #[arg(
        long,
        global = true,
        env = "MENSA_DIR",
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Print logs to the console")]
    log: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Initialize or reset your Mensa session")]
    Start,
    #[command(about = "View or edit your plans")]
    Plan {
        #[command(subcommand)]
        action: Option<PlanCommand>,
    },
    #[command(about = "Log your mood, thoughts, or reflections")]
    Journal {
        #[arg(help = "Entry text. Asked for interactively when omitted")]
        text: Vec<String>,
    },
    #[command(about = "Mark which of today's tasks you completed")]
    Checkin,
    #[command(about = "Check your current streak status")]
    Streak,
    #[command(about = "View your performance snapshot")]
    Summary {
        #[arg(value_enum)]
        period: SummaryPeriod,
    },
    #[command(about = "View warnings or missed activity")]
    Reminder,
    #[command(about = "Record whether you journaled and planned today")]
    Review,
    #[command(about = "View journaling and planning over the last 7 days")]
    Weekly,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum PlanCommand {
    #[command(about = "Add your top 3 priorities for today")]
    Today {
        #[arg(long, conflicts_with = "view", help = "Replace today's plan")]
        edit: bool,
        #[arg(long, help = "Only display today's plan")]
        view: bool,
    },
    #[command(about = "Display the plan of a specific day")]
    Show {
        #[arg(
            long,
            short,
            help = "Day to display. Examples are \"yesterday\", \"2 days ago\", \"15/03/2025\""
        )]
        date: String,
        #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
        date_style: DateStyle,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryPeriod {
    Week,
}

pub fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .clone()
        .map_or_else(create_application_default_path, ensure_dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir.join("logs"), logging_level, args.log)?;

    single_thread_runtime()?.block_on(async move {
        let store = JsonStore::new(app_dir.join("data"))?;
        let mut ctx = Context::open(
            store,
            Box::new(DefaultClock),
            StdinPrompt::new(),
            std::io::stdout(),
        )
        .await?;
        match args.command {
            Some(command) => execute(&mut ctx, command).await,
            None => run_interactive(&mut ctx).await,
        }
    })
}

/// Runs a single command and persists the session afterwards.
pub async fn execute<S: ActivityStore, P: Prompt, W: Write>(
    ctx: &mut Context<S, P, W>,
    command: Commands,
) -> Result<()> {
    debug!("Executing {command:?}");
    match command {
        Commands::Start => report::start(ctx).await?,
        Commands::Plan { action: None } => plan::list_plans(ctx).await?,
        Commands::Plan {
            action: Some(PlanCommand::Today { edit, view }),
        } => plan::plan_today(ctx, edit, view).await?,
        Commands::Plan {
            action: Some(PlanCommand::Show { date, date_style }),
        } => plan::show_plan(ctx, &date, date_style).await?,
        Commands::Journal { text } => {
            let text = (!text.is_empty()).then(|| text.join(" "));
            journal::write_journal(ctx, text).await?
        }
        Commands::Checkin => plan::checkin(ctx).await?,
        Commands::Streak => report::show_streak(ctx).await?,
        Commands::Summary {
            period: SummaryPeriod::Week,
        } => report::summary_week(ctx).await?,
        Commands::Reminder => report::show_reminders(ctx).await?,
        Commands::Review => report::review(ctx).await?,
        Commands::Weekly => report::weekly(ctx).await?,
    }
    ctx.save_session().await
}

/// Greets the user, shows pending reminders and asks which command to run.
pub async fn run_interactive<S: ActivityStore, P: Prompt, W: Write>(
    ctx: &mut Context<S, P, W>,
) -> Result<()> {
    let reminders = ctx.reminders().await?;
    for reminder in &reminders {
        ctx.say(output::warning(&reminder.to_string()))?;
    }

    let streak = ctx.current_streak().await?;
    let banner = output::format_banner(streak, ctx.now());
    ctx.say(banner)?;

    let answer = ctx
        .prompt
        .ask("\nWhich command would you like to run?\n> ")
        .await?;

    match parse_interactive(&answer) {
        Ok(Args {
            command: Some(command),
            ..
        }) => execute(ctx, command).await,
        Ok(_) => ctx.say(output::warning(
            "Unknown command. Type 'help <command>' for help.",
        )),
        Err(e) => ctx.say(e.render().to_string()),
    }
}

/// Interprets a typed command line the same way as process arguments. Quotes are dropped and
/// case is ignored.
fn parse_interactive(line: &str) -> Result<Args, clap::Error> {
    let line = line.trim().to_lowercase().replace(['\'', '"'], "");
    Args::try_parse_from(iter::once("mensa").chain(line.split_whitespace()))
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{NaiveDate, NaiveDateTime};
    use clap::{CommandFactory, Parser};
    use serde_json::json;
    use tempfile::{TempDir, tempdir};

    use crate::{
        store::{
            activity_store::{ActivityStore, Collection, JsonStore},
            collections::{JournalLog, PlanBook, StatusBook},
            entities::SessionState,
        },
        utils::{clock::MockClock, logging::TEST_LOGGING},
    };

    use super::{
        Args, Commands, PlanCommand, SummaryPeriod, context::Context, execute, parse_interactive,
        prompt::scripted::ScriptedPrompt, run_interactive,
    };

    type TestContext = Context<JsonStore, ScriptedPrompt, Vec<u8>>;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    async fn context_at(
        dir: &TempDir,
        now: NaiveDateTime,
        answers: &[&str],
    ) -> Result<TestContext> {
        *TEST_LOGGING;
        let mut clock = MockClock::new();
        clock.expect_now().return_const(now);
        let store = JsonStore::new(dir.path().to_owned())?;
        Context::open(
            store,
            Box::new(clock),
            ScriptedPrompt::new(answers.iter().copied()),
            Vec::new(),
        )
        .await
    }

    fn output(ctx: &TestContext) -> String {
        String::from_utf8_lossy(&ctx.out).to_string()
    }

    #[test]
    fn test_args_are_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_commands() {
        let args = Args::parse_from(["mensa", "summary", "week"]);
        assert_eq!(
            args.command,
            Some(Commands::Summary {
                period: SummaryPeriod::Week
            })
        );

        let args = Args::parse_from(["mensa", "plan", "today", "--view"]);
        assert_eq!(
            args.command,
            Some(Commands::Plan {
                action: Some(PlanCommand::Today {
                    edit: false,
                    view: true
                })
            })
        );

        assert!(Args::try_parse_from(["mensa", "plan", "today", "--edit", "--view"]).is_err());
        assert!(Args::try_parse_from(["mensa", "summary", "month"]).is_err());
    }

    #[test]
    fn test_parse_interactive_line() {
        let args = parse_interactive("  'Plan Today' --EDIT\n").unwrap();
        assert_eq!(
            args.command,
            Some(Commands::Plan {
                action: Some(PlanCommand::Today {
                    edit: true,
                    view: false
                })
            })
        );
        assert_eq!(parse_interactive("").unwrap().command, None);
        assert!(parse_interactive("dance").is_err());
        assert!(parse_interactive("help checkin").is_err());
    }

    #[tokio::test]
    async fn test_plan_checkin_and_summary() -> Result<()> {
        let dir = tempdir()?;

        let mut ctx = context_at(&dir, at(3, 9), &["Workout #health", "", "Read"]).await?;
        execute(
            &mut ctx,
            Commands::Plan {
                action: Some(PlanCommand::Today {
                    edit: false,
                    view: false,
                }),
            },
        )
        .await?;
        assert_eq!(ctx.prompt.questions.len(), 3);
        assert!(output(&ctx).contains("Today's plan saved."));

        let plans: PlanBook = ctx.store.load(Collection::Plans).await?;
        let plan = plans.get(at(3, 0).date()).unwrap();
        assert_eq!(plan.tasks.len(), 2);
        assert_eq!(plan.tasks[0].tag.as_deref(), Some("health"));

        // A second plan for the same day is refused without --edit.
        let mut ctx = context_at(&dir, at(3, 10), &[]).await?;
        execute(
            &mut ctx,
            Commands::Plan {
                action: Some(PlanCommand::Today {
                    edit: false,
                    view: false,
                }),
            },
        )
        .await?;
        assert!(output(&ctx).contains("already exists"));
        assert!(ctx.prompt.questions.is_empty());

        let mut ctx = context_at(&dir, at(3, 20), &["y", "n"]).await?;
        execute(&mut ctx, Commands::Checkin).await?;
        assert!(output(&ctx).contains("Not all tasks complete"));
        execute(&mut ctx, Commands::Reminder).await?;
        assert!(output(&ctx).contains("1 incomplete task(s)"));

        let mut ctx = context_at(&dir, at(3, 21), &["yes", "y"]).await?;
        execute(&mut ctx, Commands::Checkin).await?;
        assert!(output(&ctx).contains("All tasks complete!"));
        execute(&mut ctx, Commands::Reminder).await?;
        assert!(output(&ctx).contains("on track"));

        execute(
            &mut ctx,
            Commands::Summary {
                period: SummaryPeriod::Week,
            },
        )
        .await?;
        let text = output(&ctx);
        assert!(text.contains("2/2 (100%)"));
        assert!(text.contains("1 active day this week."));
        Ok(())
    }

    #[tokio::test]
    async fn test_checkin_without_plan() -> Result<()> {
        let dir = tempdir()?;
        let mut ctx = context_at(&dir, at(3, 9), &[]).await?;
        execute(&mut ctx, Commands::Checkin).await?;
        assert!(output(&ctx).contains("No plan found for today"));
        assert!(ctx.prompt.questions.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_journal_streak_and_session() -> Result<()> {
        let dir = tempdir()?;
        for d in 1..=3 {
            let mut ctx = context_at(&dir, at(d, 22), &[]).await?;
            execute(
                &mut ctx,
                Commands::Journal {
                    text: vec!["feeling".into(), "good".into()],
                },
            )
            .await?;
        }

        let mut ctx = context_at(&dir, at(3, 23), &[]).await?;
        execute(&mut ctx, Commands::Streak).await?;
        assert!(output(&ctx).contains("Current streak: 3 days"));

        let journal: JournalLog = ctx.store.load(Collection::Journal).await?;
        assert_eq!(journal.entries().len(), 3);
        assert_eq!(journal.entries()[2].text, "feeling good");

        let session: SessionState = ctx.store.load(Collection::Session).await?;
        assert_eq!(session.streak, 3);
        assert_eq!(session.last_active_date, Some(at(3, 0).date()));
        assert_eq!(session.today_plan, None);

        // Two days later the streak is gone and reported once.
        let mut ctx = context_at(&dir, at(5, 12), &[]).await?;
        execute(&mut ctx, Commands::Reminder).await?;
        let text = output(&ctx);
        assert_eq!(text.matches("You broke your streak!").count(), 1);
        assert!(text.contains("over 24 hours"));
        assert!(!text.contains("No active streak"));
        Ok(())
    }

    #[tokio::test]
    async fn test_journal_asks_for_text() -> Result<()> {
        let dir = tempdir()?;
        let mut ctx = context_at(&dir, at(3, 9), &["  "]).await?;
        execute(&mut ctx, Commands::Journal { text: vec![] }).await?;
        assert!(output(&ctx).contains("Nothing to save."));

        let mut ctx = context_at(&dir, at(3, 9), &["Calm morning"]).await?;
        execute(&mut ctx, Commands::Journal { text: vec![] }).await?;
        let journal: JournalLog = ctx.store.load(Collection::Journal).await?;
        assert_eq!(journal.entries().len(), 1);
        assert_eq!(journal.entries()[0].timestamp, at(3, 9));
        Ok(())
    }

    #[tokio::test]
    async fn test_review_and_weekly() -> Result<()> {
        let dir = tempdir()?;
        let mut ctx = context_at(&dir, at(3, 9), &[]).await?;
        execute(&mut ctx, Commands::Weekly).await?;
        assert!(output(&ctx).contains("No activity tracked this week."));

        execute(
            &mut ctx,
            Commands::Journal {
                text: vec!["entry".into()],
            },
        )
        .await?;
        execute(&mut ctx, Commands::Review).await?;
        let text = output(&ctx);
        assert!(text.contains("journaled true, planned false"));
        assert!(text.contains("Journaled 1 day in a row"));

        let status: StatusBook = ctx.store.load(Collection::Status).await?;
        assert_eq!(status.len(), 1);

        execute(&mut ctx, Commands::Weekly).await?;
        let text = output(&ctx);
        assert!(text.contains("Journaled 1 out of 1 days"));
        assert!(text.contains("Planned 0 out of 1 days"));
        Ok(())
    }

    #[tokio::test]
    async fn test_start_rebuilds_session() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonStore::new(dir.path().to_owned())?;
        std::fs::write(
            store.path_for(Collection::Session),
            json!({"streak": 40, "last_active": "2020-01-01", "today_plan": {}}).to_string(),
        )?;

        let mut ctx = context_at(&dir, at(3, 9), &[]).await?;
        assert_eq!(ctx.session().streak, 40);
        execute(&mut ctx, Commands::Start).await?;

        let session: SessionState = ctx.store.load(Collection::Session).await?;
        assert_eq!(session, SessionState::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_plan_listing_and_lookup() -> Result<()> {
        let dir = tempdir()?;
        let mut ctx = context_at(&dir, at(3, 9), &["Stretch"]).await?;
        execute(&mut ctx, Commands::Plan { action: None }).await?;
        assert!(output(&ctx).contains("No upcoming plans"));

        execute(
            &mut ctx,
            Commands::Plan {
                action: Some(PlanCommand::Today {
                    edit: false,
                    view: false,
                }),
            },
        )
        .await?;

        let mut ctx = context_at(&dir, at(4, 9), &[]).await?;
        execute(
            &mut ctx,
            Commands::Plan {
                action: Some(PlanCommand::Show {
                    date: "yesterday".into(),
                    date_style: super::DateStyle::Uk,
                }),
            },
        )
        .await?;
        assert!(output(&ctx).contains("[ ] Stretch"));

        execute(&mut ctx, Commands::Plan { action: None }).await?;
        assert!(output(&ctx).contains("No upcoming plans"));
        Ok(())
    }

    #[tokio::test]
    async fn test_interactive_dispatch() -> Result<()> {
        let dir = tempdir()?;
        let mut ctx = context_at(&dir, at(3, 9), &["'streak'"]).await?;
        run_interactive(&mut ctx).await?;
        let text = output(&ctx);
        assert!(text.contains("Welcome to Mensa"));
        assert!(text.contains("No active streak"));
        assert_eq!(text.matches("Current streak: 0 days").count(), 2);

        let mut ctx = context_at(&dir, at(3, 9), &["dance"]).await?;
        run_interactive(&mut ctx).await?;
        assert!(output(&ctx).contains("unrecognized subcommand"));
        Ok(())
    }
}
