//! Command-line companion for daily plans, journaling and check-ins.
//! Everything is kept in a handful of local JSON documents, and streaks, summaries and reminders
//! are derived from them on every run.
//!

pub mod cli;
pub mod store;
pub mod tracker;
pub mod utils;
