use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single item of a daily plan. Check-ins flip `done` in place.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct Task {
    #[serde(rename = "task")]
    pub description: String,
    #[serde(default, with = "tag_ser")]
    pub tag: Option<String>,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    pub fn new(description: impl Into<String>, tag: Option<String>) -> Self {
        Self {
            description: description.into(),
            tag,
            done: false,
        }
    }

    /// Parses user input of the form `Workout #health`. Everything after the first `#` is the
    /// tag. Blank input yields no task.
    pub fn from_input(raw: &str) -> Option<Task> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let task = match raw.split_once('#') {
            Some((description, tag)) => {
                let tag = tag.trim();
                Task::new(
                    description.trim(),
                    (!tag.is_empty()).then(|| tag.to_string()),
                )
            }
            None => Task::new(raw, None),
        };
        Some(task)
    }
}

/// An empty tag is stored as `""` on disk, but there is no difference between it and a missing
/// tag.
mod tag_ser {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(tag: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(tag.as_deref().unwrap_or_default())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = Option::<String>::deserialize(deserializer)?;
        Ok(tag.filter(|v| !v.trim().is_empty()))
    }
}

/// Tasks planned for a day. There is at most one plan per date, see
/// [PlanBook](super::collections::PlanBook).
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct DailyPlan {
    pub date: NaiveDate,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl DailyPlan {
    pub fn new(date: NaiveDate, tasks: Vec<Task>) -> Self {
        Self { date, tasks }
    }

    pub fn completed(&self) -> usize {
        self.tasks.iter().filter(|v| v.done).count()
    }

    pub fn incomplete(&self) -> usize {
        self.tasks.len() - self.completed()
    }
}

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct JournalEntry {
    #[serde(with = "timestamp_ser")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "entry")]
    pub text: String,
}

mod timestamp_ser {
    use chrono::NaiveDateTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use crate::utils::time::{format_timestamp, parse_timestamp};

    pub fn serialize<S>(moment: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_timestamp(*moment))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_timestamp(&s).map_err(D::Error::custom)
    }
}

/// Process-wide state persisted between invocations. It is a snapshot only: streaks are always
/// recomputed from the underlying records and never trusted from here.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Default)]
pub struct SessionState {
    #[serde(default)]
    pub streak: u32,
    #[serde(default, rename = "last_active")]
    pub last_active_date: Option<NaiveDate>,
    #[serde(default, with = "plan_snapshot_ser")]
    pub today_plan: Option<DailyPlan>,
}

/// A missing snapshot is written as `{}`.
mod plan_snapshot_ser {
    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::{Map, Value};

    use super::DailyPlan;

    pub fn serialize<S>(plan: &Option<DailyPlan>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match plan {
            Some(plan) => plan.serialize(serializer),
            None => Map::new().serialize(serializer),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DailyPlan>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::Object(map) if map.is_empty() => Ok(None),
            v => serde_json::from_value(v).map(Some).map_err(D::Error::custom),
        }
    }
}

/// Flags stored for a date in the status collection.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct StatusFlags {
    #[serde(default)]
    pub journaled: bool,
    #[serde(default)]
    pub planned: bool,
}

/// A [StatusFlags] bound to its date.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct StatusRecord {
    pub date: NaiveDate,
    pub journaled: bool,
    pub planned: bool,
}

impl StatusRecord {
    pub fn new(date: NaiveDate, flags: StatusFlags) -> Self {
        Self {
            date,
            journaled: flags.journaled,
            planned: flags.planned,
        }
    }

    pub fn flags(&self) -> StatusFlags {
        StatusFlags {
            journaled: self.journaled,
            planned: self.planned,
        }
    }
}
