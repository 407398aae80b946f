// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! iCalendar output workflow tests.
//!
//! Documents are parsed and serialized; the resulting text must describe
//! exactly the occurrences that were parsed.

use ttcal_core::{FormatOptions, ParseOptions, parse, serialize_at, serialize_with};

use crate::common::{
    TestCell, count_ics_occurrences, document_xml, fixed_stamp, ics_property, timetable,
};

fn monday_course(entry: &str) -> String {
    let rows = timetable(
        &["星期一"],
        &[("第1节 08:00~08:45", vec![TestCell::text(entry)])],
    );
    document_xml("课表", &rows)
}

#[test]
fn ics_output_describes_every_occurrence() {
    // Arrange
    let rows = timetable(
        &["星期一", "星期三", "星期五"],
        &[
            (
                "第1节 08:00~08:45",
                vec![
                    TestCell::text("1-16/(必修)高等数学/张三/A101/60"),
                    TestCell::text("1、3、4/线性代数/李四/A102/40"),
                    TestCell::text("2-16双周/英语/王五/B201/35"),
                ],
            ),
            (
                "第2节 08:55~09:40",
                vec![
                    TestCell::empty(),
                    TestCell::text("5/讲座/赵六/报告厅/200"),
                    TestCell::empty(),
                ],
            ),
        ],
    );
    let xml = document_xml("课表", &rows);
    let result = parse(xml.as_str(), &ParseOptions::default()).unwrap();

    // Act
    let ics = serialize_at(&result.events, &result.time_zone, fixed_stamp());

    // Assert
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 4);
    assert_eq!(count_ics_occurrences(&ics), result.occurrence_count());
    assert_eq!(count_ics_occurrences(&ics), 16 + 3 + 8 + 1);
    assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(ics.ends_with("END:VCALENDAR"));
    assert_eq!(ics_property(&ics, "X-WR-TIMEZONE"), vec!["Asia/Shanghai"]);
    assert!(
        ics_property(&ics, "DTSTAMP")
            .iter()
            .all(|stamp| *stamp == "20250901T000000Z")
    );
}

#[test]
fn ics_output_weekly_course() {
    // Arrange
    let xml = monday_course("1-16/(必修)高等数学/张三/A101/60");
    let result = parse(xml.as_str(), &ParseOptions::default()).unwrap();

    // Act
    let ics = serialize_at(&result.events, &result.time_zone, fixed_stamp());

    // Assert
    assert_eq!(ics_property(&ics, "UID"), vec![result.events[0].uid.as_str()]);
    assert_eq!(ics_property(&ics, "SUMMARY"), vec!["高等数学"]);
    assert_eq!(ics_property(&ics, "LOCATION"), vec!["A101"]);
    assert_eq!(
        ics_property(&ics, "DESCRIPTION"),
        vec![r"(必修)\n教师: 张三\n人数: 60\n周次: 1-16"]
    );
    assert_eq!(ics_property(&ics, "DTSTART"), vec!["20250908T080000"]);
    assert_eq!(ics_property(&ics, "DTEND"), vec!["20250908T084500"]);
    assert_eq!(
        ics_property(&ics, "RRULE"),
        vec!["FREQ=WEEKLY;INTERVAL=1;COUNT=16"]
    );
    assert!(ics.contains("DTSTART;TZID=Asia/Shanghai:20250908T080000\r\n"));
    assert!(ics_property(&ics, "RDATE").is_empty());
}

#[test]
fn ics_output_even_weeks_use_interval() {
    // Arrange
    let xml = monday_course("2-8双周/体育/孙八/操场/30");
    let result = parse(xml.as_str(), &ParseOptions::default()).unwrap();

    // Act
    let ics = serialize_at(&result.events, &result.time_zone, fixed_stamp());

    // Assert
    assert_eq!(ics_property(&ics, "DTSTART"), vec!["20250915T080000"]);
    assert_eq!(
        ics_property(&ics, "RRULE"),
        vec!["FREQ=WEEKLY;INTERVAL=2;COUNT=4"]
    );
    assert!(ics_property(&ics, "RDATE").is_empty());
}

#[test]
fn ics_output_irregular_weeks_use_rdate() {
    // Arrange
    let xml = monday_course("1、3、4/线性代数/李四/A102/40");
    let result = parse(xml.as_str(), &ParseOptions::default()).unwrap();

    // Act
    let ics = serialize_at(&result.events, &result.time_zone, fixed_stamp());

    // Assert
    assert!(ics_property(&ics, "RRULE").is_empty());
    assert_eq!(
        ics_property(&ics, "RDATE"),
        vec!["20250922T080000,20250929T080000"]
    );
    assert!(ics.contains("RDATE;TZID=Asia/Shanghai:20250922T080000,20250929T080000"));
}

#[test]
fn ics_output_single_week_has_no_recurrence() {
    // Arrange
    let xml = monday_course("9/期中考试/教务处/体育馆/");
    let result = parse(xml.as_str(), &ParseOptions::default()).unwrap();

    // Act
    let ics = serialize_at(&result.events, &result.time_zone, fixed_stamp());

    // Assert
    assert_eq!(ics_property(&ics, "DTSTART"), vec!["20251103T080000"]);
    assert!(ics_property(&ics, "RRULE").is_empty());
    assert!(ics_property(&ics, "RDATE").is_empty());
    assert_eq!(count_ics_occurrences(&ics), 1);
}

#[test]
fn ics_output_escapes_text_values() {
    // Arrange
    let xml = monday_course("1-2/研讨课;A,B/Smith\\Lee/Room 1, East/12");
    let result = parse(xml.as_str(), &ParseOptions::default()).unwrap();

    // Act
    let ics = serialize_at(&result.events, &result.time_zone, fixed_stamp());

    // Assert
    assert_eq!(ics_property(&ics, "SUMMARY"), vec![r"研讨课\;A\,B"]);
    assert_eq!(ics_property(&ics, "LOCATION"), vec![r"Room 1\, East"]);
    assert!(ics.contains(r"教师: Smith\\Lee"));
}

#[test]
fn ics_output_folds_long_lines() {
    // Arrange
    let xml = monday_course("1-16/(必修)面向对象程序设计与软件工程综合实践课程/张三/信息科学与技术学院实验中心三楼东侧第二计算机机房/60");
    let result = parse(xml.as_str(), &ParseOptions::default()).unwrap();
    let options = FormatOptions::default().folding(Some(FormatOptions::RFC_LINE_LENGTH));

    // Act
    let folded = serialize_with(
        &result.events,
        &result.time_zone,
        fixed_stamp(),
        options,
    );
    let plain = serialize_at(&result.events, &result.time_zone, fixed_stamp());

    // Assert
    assert!(folded.split("\r\n").all(|line| line.len() <= 75));
    assert!(folded.contains("\r\n "));
    assert_eq!(folded.replace("\r\n ", ""), plain);
}
