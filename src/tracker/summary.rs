use chrono::NaiveDate;

use crate::{
    store::collections::PlanBook,
    utils::{
        percentage::{Percentage, ratio_percentage},
        time::trailing_days,
    },
};

/// Number of days covered by a weekly report, today included.
pub const WEEK_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub done: usize,
    pub total: usize,
}

impl DaySummary {
    /// A day without a plan and a day with an empty plan look the same.
    pub fn no_data(date: NaiveDate) -> Self {
        Self {
            date,
            done: 0,
            total: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.total > 0
    }

    pub fn is_complete(&self) -> bool {
        self.is_active() && self.done == self.total
    }

    pub fn completion(&self) -> Option<Percentage> {
        ratio_percentage(self.done, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySummary {
    /// Oldest first.
    pub days: Vec<DaySummary>,
    pub active_days: usize,
}

/// Task completion for each of the trailing [WEEK_DAYS] days ending with `today`.
pub fn weekly_summary(plans: &PlanBook, today: NaiveDate) -> WeeklySummary {
    let days = trailing_days(today, WEEK_DAYS)
        .map(|date| match plans.get(date) {
            Some(plan) => DaySummary {
                date,
                done: plan.completed(),
                total: plan.tasks.len(),
            },
            None => DaySummary::no_data(date),
        })
        .collect::<Vec<_>>();
    let active_days = days.iter().filter(|v| v.is_active()).count();
    WeeklySummary { days, active_days }
}
