use std::fmt::Display;

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::store::entities::{DailyPlan, JournalEntry, SessionState};

use super::streak::Streak;

/// Time without any journal entry or plan after which the user is nudged.
pub const INACTIVITY_THRESHOLD: Duration = Duration::hours(24);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reminder {
    StreakBroken,
    NoActiveStreak,
    PendingTasks { incomplete: usize },
    Inactive { since: NaiveDateTime },
}

impl Display for Reminder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reminder::StreakBroken => write!(f, "You broke your streak! Try to keep it going."),
            Reminder::NoActiveStreak => {
                write!(f, "No active streak. Start journaling or checking in!")
            }
            Reminder::PendingTasks { incomplete } => write!(
                f,
                "You have {incomplete} incomplete task(s) in your daily plan."
            ),
            Reminder::Inactive { .. } => write!(
                f,
                "It's been over 24 hours since your last check-in or journal entry."
            ),
        }
    }
}

/// Everything the reminder checks look at.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReminderContext<'a> {
    pub streak: Streak,
    pub today_plan: Option<&'a DailyPlan>,
    pub last_activity: Option<NaiveDateTime>,
}

impl<'a> ReminderContext<'a> {
    /// Builds a context out of the persisted session snapshot instead of fresh records. The
    /// snapshot can't tell a broken streak apart from no streak, so `missed` is never set.
    pub fn from_session(session: &'a SessionState) -> Self {
        Self {
            streak: Streak {
                days: session.streak,
                missed: false,
            },
            today_plan: session.today_plan.as_ref(),
            last_activity: session
                .last_active_date
                .map(|v| v.and_time(NaiveTime::MIN)),
        }
    }
}

pub fn check_streak(streak: Streak) -> Option<Reminder> {
    if streak.missed {
        Some(Reminder::StreakBroken)
    } else if streak.days == 0 {
        Some(Reminder::NoActiveStreak)
    } else {
        None
    }
}

pub fn check_pending_tasks(today_plan: Option<&DailyPlan>) -> Option<Reminder> {
    match today_plan.map(DailyPlan::incomplete) {
        Some(incomplete) if incomplete > 0 => Some(Reminder::PendingTasks { incomplete }),
        Some(_) | None => None,
    }
}

pub fn check_inactivity(last_activity: Option<NaiveDateTime>, now: NaiveDateTime) -> Option<Reminder> {
    let since = last_activity?;
    (now - since > INACTIVITY_THRESHOLD).then_some(Reminder::Inactive { since })
}

/// Latest recorded activity: the newest journal timestamp or the start of the newest plan day,
/// whichever is later.
pub fn last_activity(journal: &[JournalEntry], plans: &[DailyPlan]) -> Option<NaiveDateTime> {
    let last_journal = journal.iter().map(|v| v.timestamp).max();
    let last_plan = plans.iter().map(|v| v.date.and_time(NaiveTime::MIN)).max();
    last_journal.max(last_plan)
}

/// Runs every check and keeps the messages in a fixed order: streak, pending tasks, inactivity.
/// Checks never short-circuit each other.
pub fn evaluate(context: &ReminderContext<'_>, now: NaiveDateTime) -> Vec<Reminder> {
    [
        check_streak(context.streak),
        check_pending_tasks(context.today_plan),
        check_inactivity(context.last_activity, now),
    ]
    .into_iter()
    .flatten()
    .collect()
}
