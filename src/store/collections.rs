//! In-memory views over the persisted collections. Every view keeps entries that couldn't be
//! understood aside and writes them back untouched, so a broken record never costs the user data.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{
    de::DeserializeOwned, ser::SerializeSeq, Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value;
use tracing::warn;

use crate::utils::time::{date_to_record_name, parse_record_name};

use super::entities::{DailyPlan, JournalEntry, StatusFlags, StatusRecord, Task};

/// A JSON array of records where each element is parsed on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordList<T> {
    records: Vec<T>,
    skipped: Vec<Value>,
}

impl<T> Default for RecordList<T> {
    fn default() -> Self {
        Self {
            records: vec![],
            skipped: vec![],
        }
    }
}

impl<T> RecordList<T> {
    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn push(&mut self, record: T) {
        self.records.push(record);
    }

    pub fn skipped(&self) -> usize {
        self.skipped.len()
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for RecordList<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values = Vec::<Value>::deserialize(deserializer)?;
        let mut list = RecordList::default();
        for value in values {
            match T::deserialize(&value) {
                Ok(v) => list.records.push(v),
                Err(e) => {
                    // Hand edited or partially written entries. They are ignored for every
                    // computation.
                    warn!("Skipping unreadable record {value}: {e}");
                    list.skipped.push(value);
                }
            }
        }
        Ok(list)
    }
}

impl<T: Serialize> Serialize for RecordList<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.records.len() + self.skipped.len()))?;
        for record in &self.records {
            seq.serialize_element(record)?;
        }
        for value in &self.skipped {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

/// Append-only journal.
pub type JournalLog = RecordList<JournalEntry>;

impl JournalLog {
    pub fn entries(&self) -> &[JournalEntry] {
        self.records()
    }

    pub fn has_entry_on(&self, date: NaiveDate) -> bool {
        self.records.iter().any(|v| v.timestamp.date() == date)
    }
}

/// All daily plans, with at most one plan per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RecordList<DailyPlan>", into = "RecordList<DailyPlan>")]
pub struct PlanBook {
    plans: RecordList<DailyPlan>,
}

impl From<RecordList<DailyPlan>> for PlanBook {
    fn from(RecordList { records, mut skipped }: RecordList<DailyPlan>) -> Self {
        let mut plans: Vec<DailyPlan> = Vec::with_capacity(records.len());
        for plan in records {
            if plans.iter().any(|v| v.date == plan.date) {
                warn!("Found a second plan for {}, only the first one is used", plan.date);
                match serde_json::to_value(&plan) {
                    Ok(v) => skipped.push(v),
                    Err(e) => warn!("Couldn't preserve duplicate plan for {}: {e}", plan.date),
                }
            } else {
                plans.push(plan);
            }
        }
        Self {
            plans: RecordList {
                records: plans,
                skipped,
            },
        }
    }
}

impl From<PlanBook> for RecordList<DailyPlan> {
    fn from(book: PlanBook) -> Self {
        book.plans
    }
}

impl PlanBook {
    pub fn plans(&self) -> &[DailyPlan] {
        self.plans.records()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyPlan> {
        self.plans.records.iter().find(|v| v.date == date)
    }

    fn get_mut(&mut self, date: NaiveDate) -> Option<&mut DailyPlan> {
        self.plans.records.iter_mut().find(|v| v.date == date)
    }

    /// Replaces the tasks of the plan for `date`, or creates the plan.
    pub fn upsert(&mut self, date: NaiveDate, tasks: Vec<Task>) -> &DailyPlan {
        let index = match self.plans.records.iter().position(|v| v.date == date) {
            Some(index) => {
                self.plans.records[index].tasks = tasks;
                index
            }
            None => {
                self.plans.records.push(DailyPlan::new(date, tasks));
                self.plans.records.len() - 1
            }
        };
        &self.plans.records[index]
    }

    /// Applies check-in answers to the plan for `date` positionally. Answers beyond the number of
    /// tasks are ignored. Returns `None` when there is no plan for that date.
    pub fn mark_done(&mut self, date: NaiveDate, answers: &[bool]) -> Option<&DailyPlan> {
        let plan = self.get_mut(date)?;
        for (task, done) in plan.tasks.iter_mut().zip(answers) {
            task.done = *done;
        }
        Some(plan)
    }

    /// Plans dated on or after `from`, earliest first.
    pub fn upcoming(&self, from: NaiveDate) -> Vec<&DailyPlan> {
        let mut plans = self
            .plans
            .records
            .iter()
            .filter(|v| v.date >= from)
            .collect::<Vec<_>>();
        plans.sort_by_key(|v| v.date);
        plans
    }
}

/// Status records keyed by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusBook {
    records: BTreeMap<NaiveDate, StatusFlags>,
    skipped: BTreeMap<String, Value>,
}

impl StatusBook {
    pub fn get(&self, date: NaiveDate) -> Option<StatusRecord> {
        self.records
            .get(&date)
            .map(|flags| StatusRecord::new(date, *flags))
    }

    pub fn upsert(&mut self, record: StatusRecord) {
        self.records.insert(record.date, record.flags());
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'de> Deserialize<'de> for StatusBook {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let mut book = StatusBook::default();
        for (key, value) in raw {
            let date = match parse_record_name(&key) {
                Ok(date) => date,
                Err(e) => {
                    warn!("Skipping status with unreadable date {key:?}: {e}");
                    book.skipped.insert(key, value);
                    continue;
                }
            };
            match StatusFlags::deserialize(&value) {
                Ok(flags) => {
                    book.records.insert(date, flags);
                }
                Err(e) => {
                    warn!("Skipping unreadable status for {key}: {e}");
                    book.skipped.insert(key, value);
                }
            }
        }
        Ok(book)
    }
}

impl Serialize for StatusBook {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        #[serde(untagged)]
        enum Entry<'a> {
            Flags(&'a StatusFlags),
            Raw(&'a Value),
        }

        let mut entries = self
            .skipped
            .iter()
            .map(|(key, value)| (key.clone(), Entry::Raw(value)))
            .collect::<BTreeMap<_, _>>();
        entries.extend(
            self.records
                .iter()
                .map(|(date, flags)| (date_to_record_name(*date), Entry::Flags(flags))),
        );
        entries.serialize(serializer)
    }
}
