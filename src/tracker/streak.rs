use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::store::entities::{DailyPlan, JournalEntry};

/// Consecutive active days ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Streak {
    pub days: u32,
    /// Today has no activity yet, but there was some before. Only a single flag is raised
    /// however long the gap is.
    pub missed: bool,
}

/// Days on which the user either wrote in the journal or had a plan.
pub fn active_dates(journal: &[JournalEntry], plans: &[DailyPlan]) -> BTreeSet<NaiveDate> {
    journal
        .iter()
        .map(|v| v.timestamp.date())
        .chain(plans.iter().map(|v| v.date))
        .collect()
}

/// Walks backwards from `today` for as long as every day is active.
///
/// Dates after `today` never contribute. When `today` itself is inactive the streak is 0, and
/// it's reported as missed if any earlier activity exists.
pub fn calculate_streak(active: &BTreeSet<NaiveDate>, today: NaiveDate) -> Streak {
    let mut days = 0;
    let mut current = Some(today);
    while let Some(day) = current.filter(|v| active.contains(v)) {
        days += 1;
        current = day.pred_opt();
    }

    let missed = days == 0 && active.range(..today).next_back().is_some();
    Streak { days, missed }
}

/// Latest active day that isn't in the future.
pub fn last_active_date(active: &BTreeSet<NaiveDate>, today: NaiveDate) -> Option<NaiveDate> {
    active.range(..=today).next_back().copied()
}
