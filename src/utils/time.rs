use chrono::{Days, NaiveDate, NaiveDateTime, ParseResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// This is the standard way of converting a date to a string in mensa. Status records are keyed
/// by it.
pub fn date_to_record_name(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_record_name(name: &str) -> ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(name, DATE_FORMAT)
}

pub fn format_timestamp(moment: NaiveDateTime) -> String {
    moment.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> ParseResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
}

/// Returns `count` consecutive days ending with `last` (inclusive), oldest first.
pub fn trailing_days(last: NaiveDate, count: u32) -> impl Iterator<Item = NaiveDate> {
    (0..count)
        .rev()
        .filter_map(move |offset| last.checked_sub_days(Days::new(offset.into())))
}
