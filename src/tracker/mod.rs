//! Everything derived from the stored records. All functions here are pure: they take the
//! records plus the current date or time and never touch the store.

pub mod reminder;
pub mod status;
pub mod streak;
pub mod summary;
