// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::{Date, Time};
use jiff::tz::TimeZone;
use jiff::{Span, Zoned};
use serde::Serialize;

use crate::error::{Result, TimetableError};

const LOCAL_DATETIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// One dated meeting of a course.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    /// Teaching week, starting at 1.
    pub week: u32,
    /// Local start time as `YYYYMMDDTHHMMSS`.
    pub dt_start: String,
    /// Local end time as `YYYYMMDDTHHMMSS`.
    pub dt_end: String,
}

/// Maps teaching weeks and weekdays onto local dates of a time zone.
///
/// Week 1 is the week containing the start date, which is expected to be a
/// Monday. This is not checked.
#[derive(Debug, Clone)]
pub struct SemesterCalendar {
    start: Date,
    time_zone: TimeZone,
}

impl SemesterCalendar {
    /// Validate the start date (`YYYY-M-D`) and the IANA time zone name.
    ///
    /// # Errors
    ///
    /// Returns [`TimetableError::InvalidStartDate`] if the date is malformed
    /// or does not exist, and [`TimetableError::InvalidTimeZone`] if the zone
    /// is unknown.
    pub fn new(start_date: &str, time_zone: &str) -> Result<Self> {
        let start = parse_start_date(start_date)
            .ok_or_else(|| TimetableError::InvalidStartDate(start_date.to_string()))?;
        let time_zone = TimeZone::get(time_zone).map_err(|e| {
            tracing::debug!(time_zone, %e, "time zone lookup failed");
            TimetableError::InvalidTimeZone(time_zone.to_string())
        })?;
        Ok(Self { start, time_zone })
    }

    /// First day of week 1.
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Time zone occurrences are resolved in.
    #[must_use]
    pub const fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    /// Date of `day_offset` (Monday = 0) in teaching week `week`.
    ///
    /// # Errors
    ///
    /// Returns an error if the date is outside of the supported range.
    pub fn date_of(&self, week: u32, day_offset: i64) -> std::result::Result<Date, jiff::Error> {
        let days = (i64::from(week) - 1) * 7 + day_offset;
        self.start.checked_add(Span::new().try_days(days)?)
    }

    /// Local start and end timestamps of a meeting.
    ///
    /// Wall-clock times falling into a DST gap are shifted forward, ambiguous
    /// ones take the earlier offset.
    ///
    /// # Errors
    ///
    /// Returns an error if the date is outside of the supported range.
    pub fn occurrence(
        &self,
        week: u32,
        day_offset: i64,
        start: Time,
        end: Time,
    ) -> std::result::Result<Occurrence, jiff::Error> {
        let date = self.date_of(week, day_offset)?;
        Ok(Occurrence {
            week,
            dt_start: self.local(date, start)?,
            dt_end: self.local(date, end)?,
        })
    }

    fn local(&self, date: Date, time: Time) -> std::result::Result<String, jiff::Error> {
        let zoned: Zoned = self.time_zone.to_zoned(date.to_datetime(time))?;
        Ok(zoned.strftime(LOCAL_DATETIME_FORMAT).to_string())
    }
}

/// Parse `YYYY-M-D` with one or more ASCII digits per field.
fn parse_start_date(s: &str) -> Option<Date> {
    let mut parts = s.trim().split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    let year: i16 = digits(year)?.parse().ok()?;
    let month: i8 = digits(month)?.parse().ok()?;
    let day: i8 = digits(day)?.parse().ok()?;
    Date::new(year, month, day).ok()
}

fn digits(part: &str) -> Option<&str> {
    (!part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())).then_some(part)
}
