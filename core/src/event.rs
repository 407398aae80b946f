// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeMap, BTreeSet};

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::course::CourseRecord;
use crate::semester::Occurrence;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;
const KEY_SEPARATOR: &str = "||";
const WEEKS_RAW_SEPARATOR: &str = "、";

/// What makes two course entries the same event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    /// Course label as written.
    pub course: String,
    /// Teacher name.
    pub teacher: String,
    /// Classroom.
    pub location: String,
    /// Weekday header of the column.
    pub day: String,
    /// Period of the first row of the cell.
    pub start_period: u32,
    /// Period of the last row of the cell.
    pub end_period: u32,
}

impl EventKey {
    /// The fields joined by `||`, with `\` and `|` inside text fields
    /// escaped by a backslash.
    #[must_use]
    pub fn identity(&self) -> String {
        let mut out = String::new();
        for field in [&self.course, &self.teacher, &self.location, &self.day] {
            for c in field.chars() {
                if matches!(c, '\\' | '|') {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push_str(KEY_SEPARATOR);
        }
        out.push_str(&self.start_period.to_string());
        out.push_str(KEY_SEPARATOR);
        out.push_str(&self.end_period.to_string());
        out
    }

    /// Stable event id: `cal-` followed by the 32-bit FNV-1a hash of the
    /// UTF-16 code units of [`identity`](Self::identity), in hex.
    #[must_use]
    pub fn uid(&self) -> String {
        let hash = self
            .identity()
            .encode_utf16()
            .fold(FNV_OFFSET_BASIS, |hash, unit| {
                (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
            });
        format!("cal-{hash:08x}")
    }
}

/// How the occurrences after the first one are expressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Recurrence {
    /// A single occurrence.
    Single,
    /// `FREQ=WEEKLY` with a fixed interval.
    Weekly {
        /// Weeks between two occurrences.
        interval: u32,
        /// Total number of occurrences.
        count: usize,
    },
    /// Explicit start timestamps of every occurrence after the first.
    Dates {
        /// Local `YYYYMMDDTHHMMSS` timestamps.
        dates: Vec<String>,
    },
}

/// Derive the recurrence from the sorted week numbers.
///
/// Weeks with one constant positive step become a weekly rule. Otherwise
/// every occurrence after the first is listed explicitly.
#[must_use]
pub fn derive_recurrence(weeks: &[u32], occurrences: &[Occurrence]) -> Recurrence {
    if let Some(interval) = constant_step(weeks) {
        return Recurrence::Weekly {
            interval,
            count: weeks.len(),
        };
    }

    match occurrences.get(1..) {
        Some(rest) if !rest.is_empty() => Recurrence::Dates {
            dates: rest.iter().map(|o| o.dt_start.clone()).collect(),
        },
        _ => Recurrence::Single,
    }
}

fn constant_step(weeks: &[u32]) -> Option<u32> {
    let mut steps = weeks.windows(2).map(|pair| match pair {
        [a, b] => i64::from(*b) - i64::from(*a),
        _ => 0,
    });
    let first = steps.next()?;
    if first <= 0 || steps.any(|step| step != first) {
        return None;
    }
    u32::try_from(first).ok()
}

/// A calendar event merged from all entries sharing one [`EventKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Stable id, see [`EventKey::uid`].
    pub uid: String,
    /// Course label as written.
    pub course_raw: String,
    /// Course type of the first entry.
    pub course_type: Option<String>,
    /// Course name of the first entry.
    pub course_name: String,
    /// Teacher name.
    pub teacher: String,
    /// Classroom.
    pub location: String,
    /// First non-zero enrollment of the entries, if any.
    pub enrollment: Option<u32>,
    /// Weekday header of the column.
    pub day_label: String,
    /// Period of the first row.
    pub start_period: u32,
    /// Period of the last row.
    pub end_period: u32,
    /// Distinct week specifications joined by `、`.
    pub weeks_raw: String,
    /// Union of the weeks, sorted.
    pub weeks: Vec<u32>,
    /// Occurrences sorted by start, unique by start.
    pub occurrences: Vec<Occurrence>,
    /// Recurrence derived from [`weeks`](Self::weeks).
    pub recurrence: Recurrence,
    /// IANA name of the time zone of the timestamps.
    pub time_zone: String,
}

impl Event {
    /// Text shown as the event title: the course name, or the raw label.
    #[must_use]
    pub fn summary(&self) -> &str {
        if self.course_name.is_empty() {
            &self.course_raw
        } else {
            &self.course_name
        }
    }
}

#[derive(Debug)]
struct Group {
    record: CourseRecord,
    weeks_raw: IndexSet<String>,
    weeks: BTreeSet<u32>,
    occurrences: BTreeMap<String, Occurrence>,
    enrollment: Option<u32>,
}

/// Merges course entries into events, in first-seen order.
#[derive(Debug, Default)]
pub struct EventAggregator {
    groups: IndexMap<EventKey, Group>,
}

impl EventAggregator {
    /// Create an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one entry and its occurrences to the group of `key`.
    pub fn add(&mut self, key: EventKey, record: &CourseRecord, occurrences: Vec<Occurrence>) {
        let group = self.groups.entry(key).or_insert_with(|| Group {
            record: record.clone(),
            weeks_raw: IndexSet::new(),
            weeks: BTreeSet::new(),
            occurrences: BTreeMap::new(),
            enrollment: record.enrollment,
        });

        group.weeks_raw.insert(record.weeks_raw.clone());
        group.weeks.extend(record.weeks.iter().copied());
        for occurrence in occurrences {
            group
                .occurrences
                .insert(occurrence.dt_start.clone(), occurrence);
        }
        if is_positive(record.enrollment) && !is_positive(group.enrollment) {
            group.enrollment = record.enrollment;
        }
    }

    /// Number of distinct events so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no entry was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Build the events, stamping them with the time zone name.
    #[must_use]
    pub fn finish(self, time_zone: &str) -> Vec<Event> {
        self.groups
            .into_iter()
            .map(|(key, group)| {
                let weeks: Vec<u32> = group.weeks.into_iter().collect();
                let occurrences: Vec<Occurrence> = group.occurrences.into_values().collect();
                let recurrence = derive_recurrence(&weeks, &occurrences);
                let weeks_raw = group
                    .weeks_raw
                    .into_iter()
                    .collect::<Vec<_>>()
                    .join(WEEKS_RAW_SEPARATOR);

                Event {
                    uid: key.uid(),
                    course_raw: key.course,
                    course_type: group.record.course_type,
                    course_name: group.record.course_name,
                    teacher: key.teacher,
                    location: key.location,
                    enrollment: group.enrollment,
                    day_label: key.day,
                    start_period: key.start_period,
                    end_period: key.end_period,
                    weeks_raw,
                    weeks,
                    occurrences,
                    recurrence,
                    time_zone: time_zone.to_string(),
                }
            })
            .collect()
    }
}

fn is_positive(n: Option<u32>) -> bool {
    n.is_some_and(|n| n > 0)
}
