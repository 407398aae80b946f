// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Timetable extraction workflow tests.
//!
//! These tests validate how table layouts turn into events: weekday and
//! period lookup, merged cells, multiple entries per cell, and entries
//! that are skipped.

use ttcal_core::{
    ArchiveReader, Diagnostics, ParseOptions, Recurrence, SkipReason, TimetableError, parse,
    parse_with,
};

use crate::common::{TestCell, assert_skipped, document_xml, timetable};

#[test]
fn timetable_single_course_expands_to_sixteen_weeks() {
    // Arrange
    let rows = timetable(
        &["星期一"],
        &[(
            "第1节 08:00~08:45",
            vec![TestCell::text("1-16/高等数学/张三/A101/60")],
        )],
    );
    let xml = document_xml("课表", &rows);

    // Act
    let result = parse(xml.as_str(), &ParseOptions::default()).unwrap();

    // Assert
    assert_eq!(result.title, "课表");
    assert_eq!(result.events.len(), 1);
    let event = &result.events[0];
    assert_eq!(event.course_name, "高等数学");
    assert_eq!(event.teacher, "张三");
    assert_eq!(event.location, "A101");
    assert_eq!(event.enrollment, Some(60));
    assert_eq!(event.occurrences.len(), 16);
    assert_eq!(event.occurrences[0].dt_start, "20250908T080000");
    assert_eq!(event.occurrences[15].dt_start, "20251222T080000");
    assert_eq!(
        event.recurrence,
        Recurrence::Weekly {
            interval: 1,
            count: 16
        }
    );
}

#[test]
fn timetable_entry_with_wrong_separator_is_skipped() {
    // Arrange
    let rows = timetable(
        &["星期一", "星期二"],
        &[(
            "第1节 08:00~08:45",
            vec![
                TestCell::text("1-16,高等数学,张三,A101,60"),
                TestCell::text("1-16/线性代数/李四/A102/40"),
            ],
        )],
    );
    let xml = document_xml("课表", &rows);

    // Act
    let result = parse(xml.as_str(), &ParseOptions::default()).unwrap();

    // Assert
    assert_eq!(result.events.len(), 1);
    assert_eq!(result.events[0].course_name, "线性代数");
    assert_eq!(result.events[0].occurrences[0].dt_start, "20250909T080000");
}

#[test]
fn timetable_vertical_merge_spans_periods() {
    // Arrange
    let rows = timetable(
        &["星期一", "星期二"],
        &[
            (
                "第1节 08:00~08:45",
                vec![
                    TestCell::restart("1-8周/(实验)物理实验/王五/实验楼201/30"),
                    TestCell::text("1-16/英语/赵六/B101/45"),
                ],
            ),
            (
                "第2节 08:55~09:40",
                vec![TestCell::merged(), TestCell::empty()],
            ),
            (
                "第3节 10:00~10:45",
                vec![TestCell::merged(), TestCell::empty()],
            ),
        ],
    );
    let xml = document_xml("课表", &rows);

    // Act
    let result = parse(xml.as_str(), &ParseOptions::default()).unwrap();

    // Assert
    assert_eq!(result.events.len(), 2);
    let lab = &result.events[0];
    assert_eq!(lab.course_type.as_deref(), Some("(实验)"));
    assert_eq!(lab.course_name, "物理实验");
    assert_eq!((lab.start_period, lab.end_period), (1, 3));
    assert_eq!(lab.occurrences[0].dt_start, "20250908T080000");
    assert_eq!(lab.occurrences[0].dt_end, "20250908T104500");
    assert_eq!(lab.occurrences.len(), 8);
}

#[test]
fn timetable_same_course_in_one_cell_is_merged() {
    // Arrange
    let rows = timetable(
        &["星期三"],
        &[(
            "第3节 10:00~10:45",
            vec![TestCell::text(
                "1-8周/数据结构/钱七/C301/50\n10-16周/数据结构/钱七/C301/50",
            )],
        )],
    );
    let xml = document_xml("课表", &rows);

    // Act
    let result = parse(xml.as_str(), &ParseOptions::default()).unwrap();

    // Assert
    assert_eq!(result.events.len(), 1);
    let event = &result.events[0];
    assert_eq!(event.weeks_raw, "1-8周、10-16周");
    assert_eq!(event.occurrences.len(), 15);
    match &event.recurrence {
        Recurrence::Dates { dates } => {
            assert_eq!(dates.len(), 14);
            assert_eq!(dates[0], "20250917T100000");
            assert!(!dates.contains(&"20251105T100000".to_string()));
        }
        other => panic!("expected explicit dates, got {other:?}"),
    }
}

#[test]
fn timetable_double_space_separates_entries() {
    // Arrange
    let rows = timetable(
        &["星期五"],
        &[(
            "第1节 08:00~08:45",
            vec![TestCell::text(
                "1-8单周/体育/孙八/操场/30  2-8双周/体育/孙八/体育馆/30",
            )],
        )],
    );
    let xml = document_xml("课表", &rows);

    // Act
    let result = parse(xml.as_str(), &ParseOptions::default()).unwrap();

    // Assert
    let locations: Vec<_> = result.events.iter().map(|e| e.location.as_str()).collect();
    assert_eq!(locations, vec!["操场", "体育馆"]);
    assert_eq!(result.events[0].weeks, vec![1, 3, 5, 7]);
    assert_eq!(
        result.events[1].recurrence,
        Recurrence::Weekly {
            interval: 2,
            count: 4
        }
    );
}

#[test]
fn timetable_collects_diagnostics_for_skips() {
    // Arrange
    let rows = timetable(
        &["星期一", "备注"],
        &[
            (
                "第1节 08:00~08:45",
                vec![
                    TestCell::text("1-16/高等数学/张三/A101/60\n1-16/高等数学/张三"),
                    TestCell::text("1-16/自习/无/图书馆/0"),
                ],
            ),
            (
                "午间",
                vec![TestCell::text("1-16/午餐/无/食堂/0"), TestCell::empty()],
            ),
        ],
    );
    let xml = document_xml("课表", &rows);
    let mut diagnostics = Diagnostics::new();

    // Act
    let result = parse_with(
        xml.as_str(),
        &ParseOptions::default(),
        &ArchiveReader::without_fallback(),
        Some(&mut diagnostics),
    )
    .unwrap();

    // Assert
    assert_eq!(result.events.len(), 1);
    assert_eq!(diagnostics.len(), 3);
    assert_skipped(
        &diagnostics,
        "1-16/高等数学/张三",
        &SkipReason::FieldCount { found: 3 },
    );
    assert_skipped(
        &diagnostics,
        "1-16/午餐/无/食堂/0",
        &SkipReason::MissingPeriod { row: 2 },
    );
    assert!(diagnostics.skips().iter().any(|s| s.reason
        == SkipReason::UnmappedDay {
            label: "备注".to_string()
        }));
}

#[test]
fn timetable_time_zone_and_start_date_are_applied() {
    // Arrange
    let rows = timetable(
        &["星期日"],
        &[(
            "第1节 09:00~10:00",
            vec![TestCell::text("1-2/Seminar/Smith/Room 1/12")],
        )],
    );
    let xml = document_xml("Timetable", &rows);
    let options = ParseOptions::default()
        .start_date("2026-3-2")
        .time_zone("America/New_York");

    // Act
    let result = parse(xml.as_str(), &options).unwrap();

    // Assert
    assert_eq!(result.time_zone, "America/New_York");
    assert_eq!(result.start_date, "2026-3-2");
    let starts: Vec<_> = result.events[0]
        .occurrences
        .iter()
        .map(|o| o.dt_start.as_str())
        .collect();
    assert_eq!(starts, vec!["20260308T090000", "20260315T090000"]);
}

#[test]
fn timetable_broken_merge_is_fatal() {
    // Arrange
    let rows = timetable(
        &["星期一"],
        &[("第1节 08:00~08:45", vec![TestCell::merged()])],
    );
    let xml = document_xml("课表", &rows);

    // Act
    let err = parse(xml.as_str(), &ParseOptions::default()).unwrap_err();

    // Assert
    assert!(matches!(
        err,
        TimetableError::BrokenMerge { row: 1, column: 1 }
    ));
}

#[test]
fn timetable_invalid_start_date_is_rejected() {
    let rows = timetable(&["星期一"], &[]);
    let xml = document_xml("课表", &rows);
    let options = ParseOptions::default().start_date("2025-9");

    let err = parse(xml.as_str(), &options).unwrap_err();

    assert!(matches!(err, TimetableError::InvalidStartDate(ref s) if s == "2025-9"));
}

#[test]
fn timetable_oversized_header_span_is_rejected() {
    // Arrange
    let rows = vec![
        vec![TestCell::empty(), TestCell::text("星期一").span(4_000_000_000)],
        vec![
            TestCell::text("第1节 08:00~08:45"),
            TestCell::text("1-16/高等数学/张三/A101/60"),
        ],
    ];
    let xml = document_xml("课表", &rows);

    // Act
    let err = parse(xml.as_str(), &ParseOptions::default()).unwrap_err();

    // Assert
    assert!(matches!(
        err,
        TimetableError::TableTooWide {
            columns: 4_000_000_001
        }
    ));
    assert!(!err.is_archive_related());
}

#[test]
fn timetable_period_with_invalid_time_is_reported() {
    // Arrange
    let rows = timetable(
        &["星期一"],
        &[
            (
                "第1节 08:60~09:45",
                vec![TestCell::text("1-16/高等数学/张三/A101/60")],
            ),
            (
                "第2节 09:55~10:40",
                vec![TestCell::text("1-16/英语/王五/B201/35")],
            ),
        ],
    );
    let xml = document_xml("课表", &rows);
    let mut diagnostics = Diagnostics::new();

    // Act
    let result = parse_with(
        xml.as_str(),
        &ParseOptions::default(),
        &ArchiveReader::without_fallback(),
        Some(&mut diagnostics),
    )
    .unwrap();

    // Assert
    assert_eq!(result.events.len(), 1);
    assert_eq!(result.periods.len(), 1);
    let skip = diagnostics.skips().first().unwrap();
    assert_eq!((skip.row, skip.column), (1, 0));
    assert_eq!(
        skip.to_string(),
        "(1, 0): period label \"第1节 08:60~09:45\" has an invalid time"
    );
    assert_skipped(
        &diagnostics,
        "1-16/高等数学/张三/A101/60",
        &SkipReason::MissingPeriod { row: 1 },
    );
}
