// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Turn a Word-exported weekly class timetable into calendar events and an
//! iCalendar (RFC 5545) file.
//!
//! The pipeline reads the `word/document.xml` part out of a `.docx` package
//! (or a Flat OPC XML file), rebuilds the first table as a dense grid with
//! merged cells resolved, extracts the course records of every cell, expands
//! them into dated occurrences across the semester and finally merges them
//! into recurring events.
//!
//! ```ignore
//! use ttcal_core::{ParseOptions, parse, serialize};
//!
//! let bytes = std::fs::read("timetable.docx")?;
//! let result = parse(bytes.as_slice(), &ParseOptions::default())?;
//! let ics = serialize(&result.events, &result.time_zone);
//! ```

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::match_bool
)]

pub mod archive;
mod course;
mod diagnostics;
mod error;
mod event;
pub mod grid;
pub mod ics;
pub mod markup;
mod options;
mod pipeline;
mod schedule;
mod semester;

pub use crate::archive::{ArchiveReader, DOCUMENT_PART, DocumentInput, FallbackDecoder};
pub use crate::course::{CourseRecord, MAX_WEEK, RecordError, parse_weeks};
pub use crate::diagnostics::{Diagnostics, Skip, SkipReason};
pub use crate::error::{Result, TimetableError};
pub use crate::event::{Event, EventAggregator, EventKey, Recurrence, derive_recurrence};
pub use crate::ics::{FormatOptions, serialize, serialize_at, serialize_with};
pub use crate::options::{DEFAULT_START_DATE, DEFAULT_TIME_ZONE, ParseOptions};
pub use crate::pipeline::{ParseResult, parse, parse_with};
pub use crate::schedule::{ColumnDayMap, Period, PeriodTable, day_offset};
pub use crate::semester::{Occurrence, SemesterCalendar};

#[cfg(feature = "zip-fallback")]
pub use crate::archive::ZipCrateDecoder;
