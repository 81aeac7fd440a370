//! Daily review flags and what can be derived from them.

use chrono::NaiveDate;

use crate::{
    store::{
        collections::{JournalLog, PlanBook, StatusBook},
        entities::{StatusFlags, StatusRecord},
    },
    utils::time::trailing_days,
};

use super::summary::WEEK_DAYS;

/// How far back habit streaks are searched.
pub const HABIT_LOOKBACK_DAYS: u32 = 30;

/// Builds today's status from the records and stores it, replacing an earlier review of the same
/// day.
pub fn review_day(
    book: &mut StatusBook,
    journal: &JournalLog,
    plans: &PlanBook,
    date: NaiveDate,
) -> StatusRecord {
    let record = StatusRecord {
        date,
        journaled: journal.has_entry_on(date),
        planned: plans.get(date).is_some_and(|v| !v.tasks.is_empty()),
    };
    book.upsert(record);
    record
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HabitStreaks {
    pub journaled: u32,
    pub planned: u32,
}

/// Consecutive reviewed days, ending today, on which each habit was kept. Each habit is counted
/// on its own and never beyond [HABIT_LOOKBACK_DAYS].
pub fn habit_streaks(book: &StatusBook, today: NaiveDate) -> HabitStreaks {
    HabitStreaks {
        journaled: consecutive_days(book, today, |v| v.journaled),
        planned: consecutive_days(book, today, |v| v.planned),
    }
}

fn consecutive_days(
    book: &StatusBook,
    today: NaiveDate,
    kept: impl Fn(&StatusRecord) -> bool,
) -> u32 {
    let window = trailing_days(today, HABIT_LOOKBACK_DAYS).collect::<Vec<_>>();
    window
        .into_iter()
        .rev()
        .take_while(|date| book.get(*date).is_some_and(|v| kept(&v)))
        .count() as u32
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// Oldest first. `None` means the day was never reviewed.
    pub days: Vec<(NaiveDate, Option<StatusFlags>)>,
    pub tracked_days: usize,
    pub journaled_days: usize,
    pub planned_days: usize,
}

/// Review flags for the trailing week ending with `today`.
pub fn weekly_status(book: &StatusBook, today: NaiveDate) -> StatusReport {
    let days = trailing_days(today, WEEK_DAYS)
        .map(|date| (date, book.get(date).map(|v| v.flags())))
        .collect::<Vec<_>>();
    let flags = || days.iter().filter_map(|(_, flags)| *flags);
    StatusReport {
        tracked_days: flags().count(),
        journaled_days: flags().filter(|v| v.journaled).count(),
        planned_days: flags().filter(|v| v.planned).count(),
        days,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};

    use crate::store::{
        collections::{JournalLog, PlanBook, StatusBook},
        entities::{JournalEntry, StatusRecord, Task},
    };

    use super::{HABIT_LOOKBACK_DAYS, HabitStreaks, habit_streaks, review_day, weekly_status};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn record(date: NaiveDate, journaled: bool, planned: bool) -> StatusRecord {
        StatusRecord {
            date,
            journaled,
            planned,
        }
    }

    #[test]
    fn test_review_day_upserts() {
        let mut book = StatusBook::default();
        let mut journal = JournalLog::default();
        let mut plans = PlanBook::default();

        let first = review_day(&mut book, &journal, &plans, day(3));
        assert_eq!(first, record(day(3), false, false));

        journal.push(JournalEntry {
            timestamp: day(3).and_hms_opt(7, 0, 0).unwrap(),
            text: "morning".into(),
        });
        plans.upsert(day(3), vec![Task::new("a", None)]);
        let second = review_day(&mut book, &journal, &plans, day(3));

        assert_eq!(second, record(day(3), true, true));
        assert_eq!(book.len(), 1);
        assert_eq!(book.get(day(3)), Some(second));
    }

    #[test]
    fn test_review_empty_plan_is_not_planned() {
        let mut book = StatusBook::default();
        let mut plans = PlanBook::default();
        plans.upsert(day(3), vec![]);
        let review = review_day(&mut book, &JournalLog::default(), &plans, day(3));
        assert!(!review.planned);
    }

    #[test]
    fn test_habit_streaks_are_independent() {
        let mut book = StatusBook::default();
        book.upsert(record(day(1), true, true));
        book.upsert(record(day(2), true, false));
        book.upsert(record(day(3), true, true));

        assert_eq!(
            habit_streaks(&book, day(3)),
            HabitStreaks {
                journaled: 3,
                planned: 1
            }
        );
        assert_eq!(habit_streaks(&book, day(4)), HabitStreaks::default());
    }

    #[test]
    fn test_habit_streaks_are_capped() {
        let today = day(30);
        let mut book = StatusBook::default();
        for offset in 0..45 {
            let date = today.checked_sub_days(Days::new(offset)).unwrap();
            book.upsert(record(date, true, false));
        }
        assert_eq!(habit_streaks(&book, today).journaled, HABIT_LOOKBACK_DAYS);
    }

    #[test]
    fn test_weekly_status() {
        let mut book = StatusBook::default();
        book.upsert(record(day(9), true, false));
        book.upsert(record(day(10), true, true));
        book.upsert(record(day(1), true, true));

        let report = weekly_status(&book, day(10));
        assert_eq!(report.days.len(), 7);
        assert_eq!(report.days[0], (day(4), None));
        assert_eq!(report.tracked_days, 2);
        assert_eq!(report.journaled_days, 2);
        assert_eq!(report.planned_days, 1);
    }

    #[test]
    fn test_weekly_status_without_records() {
        let report = weekly_status(&StatusBook::default(), day(10));
        assert!(report.days.iter().all(|(_, flags)| flags.is_none()));
        assert_eq!(report.tracked_days, 0);
    }
}
