use chrono::{Local, NaiveDateTime};

/// Represents an entity responsible for providing the current local time across the application.
/// Every date computation goes through it so that it can be pinned during testing.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
