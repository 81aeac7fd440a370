//! Storage is organized through [activity_store::ActivityStore].
//! The basic idea is:
//!   - There is a directory with one JSON document per [activity_store::Collection].
//!   - A document is always read and written as a whole. The last write wins.
//!   - A missing or malformed document is the same as an empty one.

pub mod activity_store;
pub mod collections;
pub mod entities;
