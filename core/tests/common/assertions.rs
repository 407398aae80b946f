// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Custom assertion helpers for integration tests.

use ttcal_core::{Diagnostics, SkipReason};

/// Values of every content line named `name`, parameters stripped.
///
/// # Example
///
/// ```ignore
/// assert_eq!(ics_property(&ics, "UID"), vec!["cal-18404436"]);
/// ```
#[allow(dead_code)]
pub fn ics_property<'a>(ics: &'a str, name: &str) -> Vec<&'a str> {
    ics.split("\r\n")
        .filter_map(|line| {
            let rest = line.strip_prefix(name)?;
            if !rest.starts_with([':', ';']) {
                return None;
            }
            rest.split_once(':').map(|(_, value)| value)
        })
        .collect()
}

/// Number of occurrences an iCalendar text describes: one per `VEVENT`,
/// plus `COUNT - 1` for an `RRULE` or one per `RDATE` value.
#[allow(dead_code)]
pub fn count_ics_occurrences(ics: &str) -> usize {
    let events = ics.matches("BEGIN:VEVENT").count();
    let from_rules: usize = ics_property(ics, "RRULE")
        .iter()
        .filter_map(|rule| {
            rule.split(';')
                .find_map(|part| part.strip_prefix("COUNT="))
                .and_then(|count| count.parse::<usize>().ok())
        })
        .map(|count| count.saturating_sub(1))
        .sum();
    let from_dates: usize = ics_property(ics, "RDATE")
        .iter()
        .map(|dates| dates.split(',').count())
        .sum();
    events + from_rules + from_dates
}

/// Asserts that an entry was skipped for the expected reason.
///
/// # Panics
///
/// Panics if no skip has the given entry and reason.
#[allow(dead_code)]
pub fn assert_skipped(diagnostics: &Diagnostics, entry: &str, reason: &SkipReason) {
    assert!(
        diagnostics
            .skips()
            .iter()
            .any(|skip| skip.entry.as_deref() == Some(entry) && &skip.reason == reason),
        "expected {entry:?} to be skipped with {reason}, got {:?}",
        diagnostics.skips()
    );
}
