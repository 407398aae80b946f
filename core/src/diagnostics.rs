// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Display};

/// Why a cell or course entry produced no occurrences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The column header is not a weekday.
    UnmappedDay {
        /// Header text of the column.
        label: String,
    },
    /// The entry does not have five `/`-separated fields.
    FieldCount {
        /// Number of fields found.
        found: usize,
    },
    /// The first or last row covered by the cell has no period times.
    MissingPeriod {
        /// Row without a period.
        row: usize,
    },
    /// A period label names a period or clock time that does not exist,
    /// e.g. `08:60`.
    InvalidPeriod {
        /// Label text with whitespace collapsed.
        label: String,
    },
    /// The week specification resolved to no week.
    NoWeeks,
    /// An occurrence date cannot be represented.
    DateOutOfRange(String),
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappedDay { label } => write!(f, "column header {label:?} is not a weekday"),
            Self::FieldCount { found } => {
                write!(f, "expected 5 fields separated by '/', found {found}")
            }
            Self::MissingPeriod { row } => write!(f, "row {row} has no period times"),
            Self::InvalidPeriod { label } => {
                write!(f, "period label {label:?} has an invalid time")
            }
            Self::NoWeeks => write!(f, "no week in week specification"),
            Self::DateOutOfRange(msg) => write!(f, "date out of range: {msg}"),
        }
    }
}

/// A skipped cell or course entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip {
    /// Anchor row of the cell.
    pub row: usize,
    /// Anchor column of the cell.
    pub column: usize,
    /// The course entry, or `None` when the whole cell was skipped.
    pub entry: Option<String>,
    /// What went wrong.
    pub reason: SkipReason,
}

impl Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)?;
        if let Some(entry) = &self.entry {
            write!(f, " {entry:?}")?;
        }
        write!(f, ": {}", self.reason)
    }
}

/// Collector for the entries skipped while extracting the schedule.
///
/// Skips never fail a parse. Pass a collector to
/// [`parse_with`](crate::parse_with) to find out what was ignored.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    skips: Vec<Skip>,
}

impl Diagnostics {
    /// Create an empty collector.
    #[must_use]
    pub const fn new() -> Self {
        Self { skips: Vec::new() }
    }

    /// Skips in table scan order.
    #[must_use]
    pub fn skips(&self) -> &[Skip] {
        &self.skips
    }

    /// Whether nothing was skipped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skips.is_empty()
    }

    /// Number of skips.
    #[must_use]
    pub fn len(&self) -> usize {
        self.skips.len()
    }

    pub(crate) fn push(&mut self, skip: Skip) {
        self.skips.push(skip);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Skip;
    type IntoIter = std::vec::IntoIter<Skip>;

    fn into_iter(self) -> Self::IntoIter {
        self.skips.into_iter()
    }
}

/// Logs every skip and forwards it to an optional collector.
#[derive(Debug)]
pub(crate) struct SkipReporter<'a> {
    sink: Option<&'a mut Diagnostics>,
}

impl<'a> SkipReporter<'a> {
    pub fn new(sink: Option<&'a mut Diagnostics>) -> Self {
        Self { sink }
    }

    pub fn report(&mut self, row: usize, column: usize, entry: Option<&str>, reason: SkipReason) {
        tracing::debug!(row, column, entry, %reason, "skipped");
        if let Some(sink) = &mut self.sink {
            sink.push(Skip {
                row,
                column,
                entry: entry.map(str::to_string),
                reason,
            });
        }
    }
}
