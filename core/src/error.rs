// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// Result type used throughout the timetable pipeline.
pub type Result<T, E = TimetableError> = std::result::Result<T, E>;

/// Fatal errors of the timetable pipeline.
///
/// Record-level problems (a malformed course entry, a column without a
/// weekday header, a cell spanning rows without period times) are never
/// reported through this type; they are skipped and optionally recorded in
/// [`Diagnostics`](crate::Diagnostics).
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// The input is too short to be a document.
    #[error("input is too short to be a document ({len} bytes)")]
    InputTooShort {
        /// Length of the input in bytes.
        len: usize,
    },

    /// The input is neither a ZIP package nor an XML document.
    #[error("unrecognized file format, expected a Word timetable export (.docx or Flat OPC XML)")]
    UnrecognizedFormat,

    /// No end of central directory record in the ZIP archive.
    #[error("ZIP end of central directory record not found")]
    MissingEndOfCentralDirectory,

    /// A central directory entry does not start with its signature or
    /// points outside of the archive.
    #[error("ZIP central directory is corrupted at offset {offset}")]
    CorruptedCentralDirectory {
        /// Byte offset of the broken entry.
        offset: usize,
    },

    /// The local header of an entry is missing or broken.
    #[error("ZIP local file header is corrupted at offset {offset}")]
    CorruptedLocalHeader {
        /// Byte offset of the broken header.
        offset: usize,
    },

    /// The document part is not present in the package.
    #[error("document part {name} is missing from the package")]
    MissingPart {
        /// Name of the missing part.
        name: String,
    },

    /// The Flat OPC part exists but carries no inline XML data.
    #[error("Flat OPC part {name} has no xmlData")]
    MissingXmlData {
        /// Name of the part.
        name: String,
    },

    /// The compressed data of an entry ends past the archive.
    #[error("ZIP entry {name} is truncated")]
    TruncatedEntry {
        /// Name of the entry.
        name: String,
    },

    /// Compression method other than store or deflate.
    #[error("unsupported ZIP compression method: {method}")]
    UnsupportedCompression {
        /// The method id from the central directory.
        method: u16,
    },

    /// This build cannot inflate deflate-compressed entries.
    #[error(
        "ZIP/deflate decompression is not available in this build, convert the file to Flat OPC XML"
    )]
    DecompressionUnavailable,

    /// The deflate stream of an entry is invalid.
    #[error("failed to decompress ZIP entry {name}: {reason}")]
    Inflate {
        /// Name of the entry.
        name: String,
        /// Decoder message.
        reason: String,
    },

    /// The fallback decoder could not read the archive.
    #[error("fallback ZIP decoder failed: {0}")]
    Fallback(String),

    /// The document does not contain any table.
    #[error("no timetable table found in the document")]
    MissingTable,

    /// The timetable table has no rows.
    #[error("the timetable table has no rows")]
    EmptyTable,

    /// The header row spans more columns than a timetable can have.
    #[error("the timetable table is too wide: {columns} columns")]
    TableTooWide {
        /// Span sum of the header row.
        columns: u64,
    },

    /// A vertically merged cell continues a cell that does not exist.
    #[error("broken table merge at row {row}, column {column}")]
    BrokenMerge {
        /// Row index of the continuing cell.
        row: usize,
        /// Column index of the continuing cell.
        column: usize,
    },

    /// The start date is not a `YYYY-MM-DD` calendar date.
    #[error("invalid start date: {0}")]
    InvalidStartDate(String),

    /// The time zone is not a known IANA identifier.
    #[error("invalid time zone: {0}")]
    InvalidTimeZone(String),
}

impl TimetableError {
    /// Whether the error comes from reading the ZIP container or decompressing it.
    ///
    /// When both the built-in reader and the fallback decoder fail, an
    /// archive-related error from the built-in reader is reported instead of
    /// the fallback's error.
    #[must_use]
    pub const fn is_archive_related(&self) -> bool {
        matches!(
            self,
            Self::MissingEndOfCentralDirectory
                | Self::CorruptedCentralDirectory { .. }
                | Self::CorruptedLocalHeader { .. }
                | Self::MissingPart { .. }
                | Self::TruncatedEntry { .. }
                | Self::UnsupportedCompression { .. }
                | Self::DecompressionUnavailable
                | Self::Inflate { .. }
                | Self::Fallback(_)
        )
    }
}
