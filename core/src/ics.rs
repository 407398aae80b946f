// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! iCalendar (RFC 5545) output for merged events.
//!
//! Every event becomes one `VEVENT` whose first occurrence gives `DTSTART`
//! and `DTEND`. The other occurrences are expressed with an `RRULE` or an
//! `RDATE` list, depending on the event's [`Recurrence`].

use jiff::Timestamp;

use crate::event::{Event, Recurrence};

const PRODID: &str = "-//calendar-helper//CN";
const CRLF: &str = "\r\n";
const UTC_STAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Formatting options for the iCalendar output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Maximum line length in octets before folding.
    /// - `None`: no line folding
    /// - `Some(n)`: fold lines longer than n octets with CRLF + SPACE
    ///
    /// Default: `None`.
    pub folding: Option<usize>,
}

impl FormatOptions {
    /// RFC 5545 recommends folding lines longer than 75 octets.
    pub const RFC_LINE_LENGTH: usize = 75;

    /// Set the line folding option.
    #[must_use]
    pub const fn folding(mut self, folding: Option<usize>) -> Self {
        self.folding = folding;
        self
    }
}

/// Render events as an iCalendar document, stamped with the current time.
///
/// Events without occurrences are left out.
#[must_use]
pub fn serialize(events: &[Event], time_zone: &str) -> String {
    serialize_at(events, time_zone, Timestamp::now())
}

/// Same as [`serialize`] with an explicit `DTSTAMP`.
#[must_use]
pub fn serialize_at(events: &[Event], time_zone: &str, stamp: Timestamp) -> String {
    serialize_with(events, time_zone, stamp, FormatOptions::default())
}

/// Render events with explicit `DTSTAMP` and formatting options.
#[tracing::instrument(level = "debug", skip(events), fields(count = events.len()))]
#[must_use]
pub fn serialize_with(
    events: &[Event],
    time_zone: &str,
    stamp: Timestamp,
    options: FormatOptions,
) -> String {
    let dtstamp = stamp.strftime(UTC_STAMP_FORMAT).to_string();
    let mut w = LineWriter::new(options);

    w.line("BEGIN:VCALENDAR");
    w.line(format!("PRODID:{PRODID}"));
    w.line("VERSION:2.0");
    w.line("CALSCALE:GREGORIAN");
    w.line("METHOD:PUBLISH");
    w.line(format!("X-WR-TIMEZONE:{time_zone}"));

    for event in events {
        let Some(first) = event.occurrences.first() else {
            continue;
        };

        w.line("BEGIN:VEVENT");
        w.line(format!("UID:{}", event.uid));
        w.line(format!("DTSTAMP:{dtstamp}"));
        w.line(format!("SUMMARY:{}", escape_text(event.summary())));
        if !event.location.is_empty() {
            w.line(format!("LOCATION:{}", escape_text(&event.location)));
        }
        w.line(format!("DESCRIPTION:{}", escape_text(&description(event))));
        w.line(format!("DTSTART;TZID={time_zone}:{}", first.dt_start));
        w.line(format!("DTEND;TZID={time_zone}:{}", first.dt_end));
        match &event.recurrence {
            Recurrence::Weekly { interval, count } => {
                w.line(format!("RRULE:FREQ=WEEKLY;INTERVAL={interval};COUNT={count}"));
            }
            Recurrence::Dates { dates } if !dates.is_empty() => {
                w.line(format!("RDATE;TZID={time_zone}:{}", dates.join(",")));
            }
            Recurrence::Dates { .. } | Recurrence::Single => {}
        }
        w.line("END:VEVENT");
    }

    w.line("END:VCALENDAR");
    w.finish()
}

fn description(event: &Event) -> String {
    let mut parts = Vec::with_capacity(4);
    if let Some(course_type) = event.course_type.as_deref().filter(|s| !s.is_empty()) {
        parts.push(course_type.to_string());
    }
    if !event.teacher.is_empty() {
        parts.push(format!("教师: {}", event.teacher));
    }
    if let Some(enrollment) = event.enrollment {
        parts.push(format!("人数: {enrollment}"));
    }
    if !event.weeks_raw.is_empty() {
        parts.push(format!("周次: {}", event.weeks_raw));
    }
    parts.join("\n")
}

/// Escape a TEXT value: backslash, newline, semicolon and comma.
#[must_use]
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str(r"\\"),
            '\n' => out.push_str(r"\n"),
            ';' => out.push_str(r"\;"),
            ',' => out.push_str(r"\,"),
            c => out.push(c),
        }
    }
    out
}

/// Joins content lines with CRLF, folding them when configured.
#[derive(Debug)]
struct LineWriter {
    out: String,
    options: FormatOptions,
    empty: bool,
}

impl LineWriter {
    fn new(options: FormatOptions) -> Self {
        Self {
            out: String::new(),
            options,
            empty: true,
        }
    }

    fn line(&mut self, line: impl AsRef<str>) {
        if !self.empty {
            self.out.push_str(CRLF);
        }
        self.empty = false;

        let line = line.as_ref();
        match self.options.folding {
            Some(max_len) if line.len() > max_len => fold_into(&mut self.out, line, max_len),
            _ => self.out.push_str(line),
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Write `line` folded so that no physical line exceeds `max_len` octets,
/// the leading space of continuation lines included. Multi-byte characters
/// are never split.
fn fold_into(out: &mut String, line: &str, max_len: usize) {
    let max_len = max_len.max(2);
    let mut budget = max_len;
    let mut used = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if used + len > budget && used > 0 {
            out.push_str(CRLF);
            out.push(' ');
            budget = max_len - 1;
            used = 0;
        }
        out.push(c);
        used += len;
    }
}
