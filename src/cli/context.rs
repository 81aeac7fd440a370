use std::io::Write;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::{
    store::{
        activity_store::{ActivityStore, Collection},
        collections::{JournalLog, PlanBook, StatusBook},
        entities::SessionState,
    },
    tracker::{
        reminder::{self, Reminder, ReminderContext},
        streak::{self, Streak},
    },
    utils::clock::Clock,
};

use super::prompt::Prompt;

/// State of a single invocation. The session is loaded once when the context is opened and only
/// persisted by [Context::save_session].
pub struct Context<S, P, W> {
    pub(crate) store: S,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) prompt: P,
    pub(crate) out: W,
    pub(crate) session: SessionState,
}

impl<S: ActivityStore, P: Prompt, W: Write> Context<S, P, W> {
    pub async fn open(store: S, clock: Box<dyn Clock>, prompt: P, out: W) -> Result<Self> {
        let session: SessionState = store.load_or_default(Collection::Session).await?;
        debug!("Loaded session {session:?}");
        Ok(Self {
            store,
            clock,
            prompt,
            out,
            session,
        })
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub async fn journal(&self) -> Result<JournalLog> {
        self.store.load_or_default(Collection::Journal).await
    }

    pub async fn plans(&self) -> Result<PlanBook> {
        self.store.load_or_default(Collection::Plans).await
    }

    pub async fn status(&self) -> Result<StatusBook> {
        self.store.load_or_default(Collection::Status).await
    }

    pub async fn current_streak(&self) -> Result<Streak> {
        let journal = self.journal().await?;
        let plans = self.plans().await?;
        let active = streak::active_dates(journal.entries(), plans.plans());
        Ok(streak::calculate_streak(&active, self.today()))
    }

    /// Reminders computed from the records themselves rather than from the session snapshot.
    pub async fn reminders(&self) -> Result<Vec<Reminder>> {
        let journal = self.journal().await?;
        let plans = self.plans().await?;
        let today = self.today();
        let active = streak::active_dates(journal.entries(), plans.plans());
        let context = ReminderContext {
            streak: streak::calculate_streak(&active, today),
            today_plan: plans.get(today),
            last_activity: reminder::last_activity(journal.entries(), plans.plans()),
        };
        Ok(reminder::evaluate(&context, self.now()))
    }

    pub fn reset_session(&mut self) {
        info!("Resetting session");
        self.session = SessionState::default();
    }

    /// The only save point of the session. Derived fields are recomputed from the records.
    pub async fn save_session(&mut self) -> Result<()> {
        let journal = self.journal().await?;
        let plans = self.plans().await?;
        let today = self.today();
        let active = streak::active_dates(journal.entries(), plans.plans());

        self.session.streak = streak::calculate_streak(&active, today).days;
        self.session.last_active_date = streak::last_active_date(&active, today);
        self.session.today_plan = plans.get(today).cloned();

        self.store.save(Collection::Session, &self.session).await
    }

    pub fn say(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.out, "{}", text.as_ref())?;
        Ok(())
    }
}
