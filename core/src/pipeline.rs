// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;

use crate::archive::{ArchiveReader, DocumentInput};
use crate::diagnostics::{Diagnostics, SkipReporter};
use crate::error::{Result, TimetableError};
use crate::event::Event;
use crate::grid::Grid;
use crate::markup;
use crate::options::ParseOptions;
use crate::schedule::{self, ColumnDayMap, PeriodTable};
use crate::semester::SemesterCalendar;

/// Everything read from a timetable document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    /// Document text before the timetable.
    pub title: String,
    /// Merged events in table scan order.
    pub events: Vec<Event>,
    /// Labelled period rows.
    pub periods: PeriodTable,
    /// Weekday label of every column.
    pub column_day_map: ColumnDayMap,
    /// IANA time zone of all timestamps.
    pub time_zone: String,
    /// Monday of teaching week 1.
    pub start_date: String,
}

impl ParseResult {
    /// Total number of occurrences over all events.
    #[must_use]
    pub fn occurrence_count(&self) -> usize {
        self.events.iter().map(|e| e.occurrences.len()).sum()
    }
}

/// Parse a timetable document with the default archive reader.
///
/// # Errors
///
/// See [`parse_with`].
pub fn parse<'a>(input: impl Into<DocumentInput<'a>>, options: &ParseOptions) -> Result<ParseResult> {
    parse_with(input, options, &ArchiveReader::default(), None)
}

/// Parse a timetable document.
///
/// Entries that cannot be used are skipped; pass `diagnostics` to collect
/// them.
///
/// # Errors
///
/// Returns an error if the start date or time zone is invalid, the document
/// cannot be read, it has no table, or the table has broken merges.
#[tracing::instrument(level = "debug", skip_all, fields(start_date = %options.start_date, time_zone = %options.time_zone))]
pub fn parse_with<'a>(
    input: impl Into<DocumentInput<'a>>,
    options: &ParseOptions,
    reader: &ArchiveReader,
    diagnostics: Option<&mut Diagnostics>,
) -> Result<ParseResult> {
    let calendar = SemesterCalendar::new(&options.start_date, &options.time_zone)?;

    let xml = reader.read_document(input.into())?;
    let document = markup::scan_document(&xml);
    let table = document
        .tables
        .into_iter()
        .next()
        .ok_or(TimetableError::MissingTable)?;

    let grid = Grid::build(&table.rows)?;
    let mut reporter = SkipReporter::new(diagnostics);
    let periods = PeriodTable::read(&grid, &mut reporter);
    let column_day_map = ColumnDayMap::from_grid(&grid);
    tracing::debug!(
        periods = periods.len(),
        columns = column_day_map.len(),
        "timetable layout read"
    );

    let events = schedule::collect_events(
        &grid,
        &periods,
        &column_day_map,
        &calendar,
        &options.time_zone,
        &mut reporter,
    );

    Ok(ParseResult {
        title: document.title,
        events,
        periods,
        column_day_map,
        time_zone: options.time_zone.clone(),
        start_date: options.start_date.clone(),
    })
}
