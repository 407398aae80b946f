// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - Builders for WordprocessingML timetables and their containers
//! - Assertion helpers for the generated iCalendar text

mod assertions;

#[allow(unused_imports)]
pub use assertions::{assert_skipped, count_ics_occurrences, ics_property};
#[allow(unused_imports)]
pub use fixtures::{
    TestCell, deflated_docx, document_xml, fixed_stamp, flat_opc, sample_package, stored_docx,
    timetable,
};
