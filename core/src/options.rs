// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;

/// Default first day of week 1.
pub const DEFAULT_START_DATE: &str = "2025-09-08";

/// Default time zone of the timetable.
pub const DEFAULT_TIME_ZONE: &str = "Asia/Shanghai";

/// Options of [`parse`](crate::parse).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Monday of teaching week 1, as `YYYY-MM-DD`.
    pub start_date: String,
    /// IANA time zone the timetable is read in.
    pub time_zone: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            start_date: DEFAULT_START_DATE.to_string(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
        }
    }
}

impl ParseOptions {
    /// Set the start date.
    #[must_use]
    pub fn start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = start_date.into();
        self
    }

    /// Set the time zone.
    #[must_use]
    pub fn time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }
}
