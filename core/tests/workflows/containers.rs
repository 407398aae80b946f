// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Container workflow tests.
//!
//! The same timetable is read from a `.docx` package, a Flat OPC package
//! and a bare `document.xml`, and must yield the same events.

use ttcal_core::{ArchiveReader, DOCUMENT_PART, ParseOptions, TimetableError, parse, parse_with};

use crate::common::{
    TestCell, deflated_docx, document_xml, flat_opc, sample_package, stored_docx, timetable,
};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#;

fn sample_document() -> String {
    let rows = timetable(
        &["星期一", "星期二"],
        &[
            (
                "第1节 08:00~08:45",
                vec![
                    TestCell::text("1-16/高等数学/张三/A101/60"),
                    TestCell::text("1-8周/(选修)音乐鉴赏/周九/艺术楼105/120"),
                ],
            ),
            (
                "第2节 08:55~09:40",
                vec![TestCell::empty(), TestCell::empty()],
            ),
        ],
    );
    document_xml("2025-2026学年第一学期 课表", &rows)
}

#[test]
fn containers_stored_docx_is_parsed() {
    // Arrange
    let document = sample_document();
    let docx = stored_docx(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        (DOCUMENT_PART, &document),
    ]);

    // Act
    let result = parse(&docx, &ParseOptions::default()).unwrap();

    // Assert
    assert_eq!(result.title, "2025-2026学年第一学期 课表");
    assert_eq!(result.events.len(), 2);
    assert_eq!(result.occurrence_count(), 24);
}

#[test]
fn containers_all_formats_agree() {
    // Arrange
    let document = sample_document();
    let stored = stored_docx(&[(DOCUMENT_PART, &document)]);
    let deflated = deflated_docx(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        (DOCUMENT_PART, &document),
    ]);
    let package = flat_opc(&document);
    let options = ParseOptions::default();

    // Act
    let from_text = parse(document.as_str(), &options).unwrap();
    let from_stored = parse(&stored, &options).unwrap();
    let from_deflated = parse(&deflated, &options).unwrap();
    let from_package = parse(package.as_str(), &options).unwrap();

    // Assert
    assert_eq!(from_stored, from_text);
    assert_eq!(from_deflated, from_text);
    assert_eq!(from_package, from_text);
}

#[test]
fn containers_deflated_docx_without_fallback() {
    // Arrange
    let document = sample_document();
    let docx = deflated_docx(&[(DOCUMENT_PART, &document)]);

    // Act
    let result = parse_with(
        &docx,
        &ParseOptions::default(),
        &ArchiveReader::without_fallback(),
        None,
    );

    // Assert
    assert_eq!(result.unwrap().events.len(), 2);
}

#[test]
fn containers_docx_without_document_part() {
    // Arrange
    let docx = stored_docx(&[("[Content_Types].xml", CONTENT_TYPES)]);

    // Act
    let err = parse_with(
        &docx,
        &ParseOptions::default(),
        &ArchiveReader::without_fallback(),
        None,
    )
    .unwrap_err();

    // Assert
    assert!(matches!(err, TimetableError::MissingPart { ref name } if name == DOCUMENT_PART));
    assert!(err.is_archive_related());
}

#[test]
fn containers_document_without_table() {
    // Arrange
    let document = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
        "<w:body><w:p><w:r><w:t>没有课表</w:t></w:r></w:p></w:body></w:document>"
    );

    // Act
    let err = parse(document, &ParseOptions::default()).unwrap_err();

    // Assert
    assert!(matches!(err, TimetableError::MissingTable));
}

#[test]
fn containers_unknown_bytes_are_rejected() {
    let err = parse(b"%PDF-1.7 not a timetable".as_slice(), &ParseOptions::default()).unwrap_err();

    assert!(matches!(err, TimetableError::UnrecognizedFormat));
}

#[test]
fn containers_sample_package() {
    // Arrange
    let package = sample_package();

    // Act
    let result = parse(package.as_str(), &ParseOptions::default()).unwrap();

    // Assert
    assert!(!result.title.is_empty());
    assert!(!result.events.is_empty());
    assert!(!result.periods.is_empty());
    assert!(
        result
            .events
            .iter()
            .all(|event| event.uid.starts_with("cal-") && !event.occurrences.is_empty())
    );
}
