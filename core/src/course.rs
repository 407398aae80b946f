// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

/// Upper bound for week numbers; segments reaching past it are ignored.
pub const MAX_WEEK: u32 = 100;

const FIELD_SEPARATOR: char = '/';

static WEEK_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)(?:-([0-9]+))?(.+)?$").unwrap());

/// Error for a course entry that cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// The entry does not have exactly five `/`-separated fields.
    #[error("expected 5 fields separated by '/', found {found}")]
    FieldCount {
        /// Number of fields found.
        found: usize,
    },
}

/// One course entry of a timetable cell:
/// `weeks / course / teacher / location / enrollment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRecord {
    /// Week specification as written, e.g. `1-16周`.
    pub weeks_raw: String,
    /// Weeks resolved from [`weeks_raw`](Self::weeks_raw), sorted and unique.
    pub weeks: Vec<u32>,
    /// Course label as written, e.g. `(必修)高等数学`.
    pub course_raw: String,
    /// Leading parenthetical of the label, e.g. `(必修)`.
    pub course_type: Option<String>,
    /// Label without the course type.
    pub course_name: String,
    /// Teacher name.
    pub teacher: String,
    /// Classroom, possibly empty.
    pub location: String,
    /// First number of the enrollment field.
    pub enrollment: Option<u32>,
}

impl FromStr for CourseRecord {
    type Err = RecordError;

    fn from_str(entry: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = entry.split(FIELD_SEPARATOR).map(str::trim).collect();
        let [weeks_raw, course_raw, teacher, location, size] = fields.as_slice() else {
            return Err(RecordError::FieldCount {
                found: fields.len(),
            });
        };

        let (course_type, course_name) = split_course_label(course_raw);
        Ok(Self {
            weeks_raw: (*weeks_raw).to_string(),
            weeks: parse_weeks(weeks_raw),
            course_raw: (*course_raw).to_string(),
            course_type,
            course_name,
            teacher: (*teacher).to_string(),
            location: (*location).to_string(),
            enrollment: parse_enrollment(size),
        })
    }
}

/// Resolve a week specification such as `1-8周、10-16双周` into a sorted
/// list of unique week numbers.
///
/// Segments are separated by `、`, `,` or `，`. Each segment is a week or
/// an inclusive range, optionally followed by a suffix; a suffix containing
/// `单周` keeps odd weeks only and one containing `双周` even weeks only.
/// Segments that do not start with a number are ignored.
#[must_use]
pub fn parse_weeks(raw: &str) -> Vec<u32> {
    let mut weeks = BTreeSet::new();
    for segment in raw.split(['、', ',', '，']).map(str::trim) {
        let Some(caps) = WEEK_SEGMENT.captures(segment) else {
            continue;
        };

        let Some(start) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) else {
            continue;
        };
        let end = match caps.get(2) {
            Some(m) => match m.as_str().parse::<u32>() {
                Ok(end) => end,
                Err(_) => continue,
            },
            None => start,
        };
        if start > MAX_WEEK || end > MAX_WEEK {
            tracing::debug!(segment, "week number out of range");
            continue;
        }

        let suffix = caps.get(3).map_or("", |m| m.as_str());
        let parity = if suffix.contains("单周") {
            Some(1)
        } else if suffix.contains("双周") {
            Some(0)
        } else {
            None
        };

        weeks.extend((start..=end).filter(|w| parity.is_none_or(|p| w % 2 == p)));
    }
    weeks.into_iter().collect()
}

/// Split `(必修)高等数学` into `(必修)` and `高等数学`. The name falls back to
/// the whole label when nothing follows the parenthesis.
fn split_course_label(label: &str) -> (Option<String>, String) {
    let Some((pos, paren)) = label.char_indices().find(|(_, c)| matches!(c, ')' | '）')) else {
        return (None, label.to_string());
    };

    let (course_type, name) = label.split_at(pos + paren.len_utf8());
    let name = name.trim();
    let name = if name.is_empty() { label } else { name };
    (Some(course_type.trim().to_string()), name.to_string())
}

fn parse_enrollment(size: &str) -> Option<u32> {
    let start = size.find(|c: char| c.is_ascii_digit())?;
    let digits = size.get(start..)?;
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits.get(..end)?.parse().ok()
}
