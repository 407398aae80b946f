// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Read the timetable layout out of a [`Grid`]: the header row names the
//! weekday of each column, the first column names the period of each row,
//! and every other cell holds course entries.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use jiff::civil::{Time, Weekday};
use regex::Regex;
use serde::Serialize;
use serde::ser::SerializeSeq;

use crate::course::{CourseRecord, RecordError};
use crate::diagnostics::{SkipReason, SkipReporter};
use crate::event::{Event, EventAggregator, EventKey};
use crate::grid::{Grid, GridCell};
use crate::semester::SemesterCalendar;

static PERIOD_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^第([0-9]+)节\s+([0-9]{2}:[0-9]{2})~([0-9]{2}:[0-9]{2})$").unwrap()
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static ENTRY_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n|\s{2,}").unwrap());

/// A table row labelled with a class period, e.g. `第1节 08:00~08:45`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period {
    /// Grid row of the label.
    pub row: usize,
    /// Period number.
    pub period: u32,
    /// Start time as `HH:MM`.
    pub start: String,
    /// End time as `HH:MM`.
    pub end: String,
    #[serde(skip)]
    start_time: Time,
    #[serde(skip)]
    end_time: Time,
}

impl Period {
    /// Parse a period label. Runs of whitespace count as one space.
    ///
    /// Returns `None` if the label does not match or a clock time is not a
    /// valid time of day.
    #[must_use]
    pub fn parse(row: usize, label: &str) -> Option<Self> {
        Self::read(row, label)?.ok()
    }

    /// `None` for text that is not a period label, an error for a period
    /// label whose numbers are out of range.
    fn read(row: usize, label: &str) -> Option<Result<Self, SkipReason>> {
        let label = WHITESPACE.replace_all(label, " ");
        let label = label.trim();
        let caps = PERIOD_LABEL.captures(label)?;
        let (period, start, end) = (caps.get(1)?, caps.get(2)?, caps.get(3)?);
        let (start, end) = (start.as_str(), end.as_str());

        let parsed = period
            .as_str()
            .parse::<u32>()
            .ok()
            .zip(parse_clock(start))
            .zip(parse_clock(end));
        let Some(((period, start_time), end_time)) = parsed else {
            return Some(Err(SkipReason::InvalidPeriod {
                label: label.to_string(),
            }));
        };
        Some(Ok(Self {
            row,
            period,
            start: start.to_string(),
            end: end.to_string(),
            start_time,
            end_time,
        }))
    }

    /// Start time of the period.
    #[must_use]
    pub const fn start_time(&self) -> Time {
        self.start_time
    }

    /// End time of the period.
    #[must_use]
    pub const fn end_time(&self) -> Time {
        self.end_time
    }
}

fn parse_clock(s: &str) -> Option<Time> {
    let (hour, minute) = s.split_once(':')?;
    Time::new(hour.parse().ok()?, minute.parse().ok()?, 0, 0).ok()
}

/// Periods keyed by grid row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodTable {
    periods: BTreeMap<usize, Period>,
}

impl PeriodTable {
    /// Parse the first column of every row below the header.
    #[must_use]
    pub fn from_grid(grid: &Grid) -> Self {
        Self::read(grid, &mut SkipReporter::new(None))
    }

    /// Like [`from_grid`](Self::from_grid), reporting period labels with
    /// impossible times.
    pub(crate) fn read(grid: &Grid, reporter: &mut SkipReporter<'_>) -> Self {
        let mut periods = BTreeMap::new();
        for row in 1..grid.row_count() {
            let Some(cell) = grid.cell_at(row, 0) else {
                continue;
            };
            match Period::read(row, &cell.text) {
                Some(Ok(period)) => {
                    periods.insert(row, period);
                }
                Some(Err(reason)) => reporter.report(row, 0, None, reason),
                None => {}
            }
        }
        Self { periods }
    }

    /// Period of a grid row.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&Period> {
        self.periods.get(&row)
    }

    /// Periods in row order.
    pub fn iter(&self) -> impl Iterator<Item = &Period> {
        self.periods.values()
    }

    /// Number of labelled rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Whether no row is labelled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

impl Serialize for PeriodTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.periods.len()))?;
        for period in self.periods.values() {
            seq.serialize_element(period)?;
        }
        seq.end()
    }
}

/// Weekday label of every column. Column 0 holds the period labels and is
/// always `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnDayMap {
    labels: Vec<Option<String>>,
}

impl ColumnDayMap {
    /// Read the trimmed header text of every column after the first.
    #[must_use]
    pub fn from_grid(grid: &Grid) -> Self {
        let labels = (0..grid.column_count())
            .map(|column| {
                (column > 0).then(|| {
                    grid.cell_at(0, column)
                        .map(|cell| cell.text.trim().to_string())
                        .unwrap_or_default()
                })
            })
            .collect();
        Self { labels }
    }

    /// Header label of a column.
    #[must_use]
    pub fn label(&self, column: usize) -> Option<&str> {
        self.labels.get(column)?.as_deref()
    }

    /// Weekday of a column, if its label names one.
    #[must_use]
    pub fn weekday(&self, column: usize) -> Option<Weekday> {
        self.label(column).and_then(weekday_of)
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the header is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Days from Monday for a Chinese weekday label (`星期一` = 0, `星期日` and
/// `星期天` = 6).
#[must_use]
pub fn day_offset(label: &str) -> Option<i64> {
    weekday_of(label).map(|day| i64::from(day.to_monday_zero_offset()))
}

fn weekday_of(label: &str) -> Option<Weekday> {
    let day = match label {
        "星期一" => Weekday::Monday,
        "星期二" => Weekday::Tuesday,
        "星期三" => Weekday::Wednesday,
        "星期四" => Weekday::Thursday,
        "星期五" => Weekday::Friday,
        "星期六" => Weekday::Saturday,
        "星期日" | "星期天" => Weekday::Sunday,
        _ => return None,
    };
    Some(day)
}

/// Course entries of a cell: every line, or run of text separated by two
/// or more spaces, that contains a `/`.
pub(crate) fn split_entries(cell: &GridCell) -> Vec<&str> {
    let sources: Vec<&str> = if cell.paragraphs.is_empty() {
        vec![cell.text.as_str()]
    } else {
        cell.paragraphs.iter().map(String::as_str).collect()
    };

    sources
        .into_iter()
        .flat_map(|paragraph| ENTRY_SEPARATOR.split(paragraph))
        .map(str::trim)
        .filter(|part| part.contains('/'))
        .collect()
}

/// Expand every course entry of the grid into dated occurrences and merge
/// them into events.
#[tracing::instrument(level = "debug", skip_all)]
pub(crate) fn collect_events(
    grid: &Grid,
    periods: &PeriodTable,
    days: &ColumnDayMap,
    calendar: &SemesterCalendar,
    time_zone: &str,
    reporter: &mut SkipReporter<'_>,
) -> Vec<Event> {
    let mut aggregator = EventAggregator::new();
    for row in 1..grid.row_count() {
        for column in 1..grid.column_count() {
            let Some(cell) = grid.cell_at(row, column) else {
                continue;
            };
            if !cell.is_anchor(row, column) {
                continue;
            }

            let entries = split_entries(cell);
            if entries.is_empty() {
                continue;
            }

            let label = days.label(column).unwrap_or_default();
            let Some(offset) = day_offset(label) else {
                let reason = SkipReason::UnmappedDay {
                    label: label.to_string(),
                };
                reporter.report(row, column, None, reason);
                continue;
            };

            let end_row = grid.find_end_row(row, column);
            for entry in entries {
                let record = match entry.parse::<CourseRecord>() {
                    Ok(record) => record,
                    Err(RecordError::FieldCount { found }) => {
                        let reason = SkipReason::FieldCount { found };
                        reporter.report(row, column, Some(entry), reason);
                        continue;
                    }
                };

                if record.weeks.is_empty() {
                    reporter.report(row, column, Some(entry), SkipReason::NoWeeks);
                    continue;
                }

                let (Some(first), Some(last)) = (periods.get(row), periods.get(end_row)) else {
                    let missing = if periods.get(row).is_none() { row } else { end_row };
                    let reason = SkipReason::MissingPeriod { row: missing };
                    reporter.report(row, column, Some(entry), reason);
                    continue;
                };

                let occurrences: Result<Vec<_>, _> = record
                    .weeks
                    .iter()
                    .map(|&week| {
                        calendar.occurrence(week, offset, first.start_time(), last.end_time())
                    })
                    .collect();
                let occurrences = match occurrences {
                    Ok(occurrences) => occurrences,
                    Err(e) => {
                        let reason = SkipReason::DateOutOfRange(e.to_string());
                        reporter.report(row, column, Some(entry), reason);
                        continue;
                    }
                };

                let key = EventKey {
                    course: record.course_raw.clone(),
                    teacher: record.teacher.clone(),
                    location: record.location.clone(),
                    day: label.to_string(),
                    start_period: first.period,
                    end_period: last.period,
                };
                aggregator.add(key, &record, occurrences);
            }
        }
    }

    tracing::debug!(events = aggregator.len(), "course entries merged");
    aggregator.finish(time_zone)
}
