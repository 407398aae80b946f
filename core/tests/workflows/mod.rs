// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end workflow tests for the ttcal-core crate.
//!
//! These tests run whole documents through `parse` and `serialize`,
//! covering the supported containers, merged cells and the generated
//! iCalendar text.

mod containers;
mod ics_output;
mod timetable;
