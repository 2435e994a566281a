//! Date-bucketed history sections.
//!
//! Events are grouped by calendar bucket relative to a reference "now":
//! today, yesterday and the rest of the current month bucket by day, older
//! history buckets by month. [`SectionList`] keeps the ordered sections
//! plus a `bucket date -> index` map so incremental merges can amend an
//! existing section or create a new one without scanning.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use super::{Collectibles, Event};

/// How the items of a section render their timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemDateFormat {
    /// Minute precision only (`09:30`), used by day buckets.
    Time,
    /// Day and minute (`14 Sep, 09:30`), used by month buckets.
    DateTime,
}

impl ItemDateFormat {
    /// Formats `timestamp` for display inside a section.
    #[must_use]
    pub fn format(self, timestamp: DateTime<Utc>) -> String {
        match self {
            Self::Time => timestamp.format("%H:%M").to_string(),
            Self::DateTime => timestamp.format("%-d %b, %H:%M").to_string(),
        }
    }
}

/// Calendar bucket an event falls into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Start of the bucket (midnight of the day, or of the first of the month).
    pub date: DateTime<Utc>,
    /// Section title.
    pub title: String,
    /// Item formatting for the section.
    pub item_date_format: ItemDateFormat,
}

impl Bucket {
    /// Computes the bucket for `timestamp` as seen at `now`.
    #[must_use]
    pub fn for_timestamp(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let day = timestamp.date_naive();
        let today = now.date_naive();

        if day == today {
            return Self::day(day, "Today".to_string());
        }
        if today.pred_opt() == Some(day) {
            return Self::day(day, "Yesterday".to_string());
        }
        if day.year() == today.year() && day.month() == today.month() {
            return Self::day(day, day.format("%-d %B").to_string());
        }

        let first = day.with_day(1).unwrap_or(day);
        let title = if day.year() == today.year() {
            first.format("%B").to_string()
        } else {
            first.format("%B %Y").to_string()
        };
        Self {
            date: midnight(first),
            title,
            item_date_format: ItemDateFormat::DateTime,
        }
    }

    fn day(day: NaiveDate, title: String) -> Self {
        Self {
            date: midnight(day),
            title,
            item_date_format: ItemDateFormat::Time,
        }
    }
}

fn midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// A display-ordered group of events sharing one calendar bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySection {
    /// Start of the bucket.
    pub bucket_date: DateTime<Utc>,
    /// Display title (`"Today"`, `"14 October"`, `"September 2024"`).
    pub title: String,
    /// How items render their timestamp.
    pub item_date_format: ItemDateFormat,
    /// Events, newest first.
    pub events: Vec<Event>,
    /// Resolved collectibles referenced by the events of this section.
    pub collectibles: Collectibles,
}

impl HistorySection {
    fn new(bucket: Bucket) -> Self {
        Self {
            bucket_date: bucket.date,
            title: bucket.title,
            item_date_format: bucket.item_date_format,
            events: Vec::new(),
            collectibles: Collectibles::new(),
        }
    }

    /// Formats an item timestamp the way this section displays it.
    #[must_use]
    pub fn format_item_date(&self, timestamp: DateTime<Utc>) -> String {
        self.item_date_format.format(timestamp)
    }

    fn insert(&mut self, event: Event, collectibles: &Collectibles) {
        for address in event.collectible_references() {
            if let Some(collectible) = collectibles.get(address) {
                self.collectibles
                    .insert(address.clone(), collectible.clone());
            }
        }
        let position = self
            .events
            .partition_point(|existing| newer_first(existing, &event));
        self.events.insert(position, event);
    }
}

/// `true` if `a` sorts before `b` (newest first, ties by id descending).
fn newer_first(a: &Event, b: &Event) -> bool {
    (a.timestamp, &a.id) > (b.timestamp, &b.id)
}

/// Ordered sections plus the bucket index used for incremental merges.
#[derive(Debug, Default)]
pub struct SectionList {
    sections: Vec<HistorySection>,
    bucket_index: HashMap<DateTime<Utc>, usize>,
    event_buckets: HashMap<String, DateTime<Utc>>,
    reference: Option<DateTime<Utc>>,
}

impl SectionList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all sections.
    pub fn clear(&mut self) {
        self.sections.clear();
        self.bucket_index.clear();
        self.event_buckets.clear();
        self.reference = None;
    }

    /// Returns the time buckets are computed against, once pinned.
    #[must_use]
    pub const fn reference(&self) -> Option<DateTime<Utc>> {
        self.reference
    }

    /// Returns the sections, newest bucket first.
    #[must_use]
    pub fn sections(&self) -> &[HistorySection] {
        &self.sections
    }

    /// Returns an owned copy of the sections for emission.
    #[must_use]
    pub fn snapshot(&self) -> Vec<HistorySection> {
        self.sections.clone()
    }

    /// Returns `true` if there are no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of events across all sections.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.event_buckets.len()
    }

    /// Merges `events` into the list, bucketing relative to `now`.
    ///
    /// The first merge after construction or [`Self::clear`] pins `now` as
    /// the reference time; later merges bucket against the pinned value so
    /// day and month keys never mix across a date change. An event whose
    /// id is already present replaces the earlier copy.
    pub fn merge(&mut self, events: Vec<Event>, collectibles: &Collectibles, now: DateTime<Utc>) {
        let now = *self.reference.get_or_insert(now);
        for event in events {
            self.remove_event(&event.id);

            let bucket = Bucket::for_timestamp(event.timestamp, now);
            let bucket_date = bucket.date;
            let index = match self.bucket_index.get(&bucket_date) {
                Some(&index) => index,
                None => self.insert_section(bucket),
            };
            self.event_buckets.insert(event.id.clone(), bucket_date);
            if let Some(section) = self.sections.get_mut(index) {
                section.insert(event, collectibles);
            }
        }
    }

    fn insert_section(&mut self, bucket: Bucket) -> usize {
        let position = self
            .sections
            .partition_point(|section| section.bucket_date > bucket.date);
        self.sections.insert(position, HistorySection::new(bucket));
        self.reindex_from(position);
        position
    }

    fn remove_event(&mut self, event_id: &str) {
        let Some(bucket_date) = self.event_buckets.remove(event_id) else {
            return;
        };
        let Some(&index) = self.bucket_index.get(&bucket_date) else {
            return;
        };
        let Some(section) = self.sections.get_mut(index) else {
            return;
        };
        section.events.retain(|event| event.id != event_id);
        if section.events.is_empty() {
            self.sections.remove(index);
            self.bucket_index.remove(&bucket_date);
            self.reindex_from(index);
        }
    }

    fn reindex_from(&mut self, start: usize) {
        for (index, section) in self.sections.iter().enumerate().skip(start) {
            self.bucket_index.insert(section.bucket_date, index);
        }
    }
}
