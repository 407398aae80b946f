// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Shallow extraction of tables and text from WordprocessingML.
//!
//! This is not an XML parser. The markup is split into tags and text by
//! [`lexer`], then a state machine in [`scanner`] follows the few elements
//! a timetable needs: `w:tbl`, `w:tr`, `w:tc`, `w:p`, `w:t`, `w:gridSpan`
//! and `w:vMerge`. Malformed input produces truncated or empty content,
//! never an error.

pub mod lexer;
mod scanner;

/// Vertical merge state of a table cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerticalMerge {
    /// Not part of a vertical merge.
    #[default]
    None,
    /// First cell of a vertical merge.
    Restart,
    /// Continues the merge started above.
    Continue,
}

/// A table cell as written in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCell {
    /// Non-empty paragraphs joined by `\n`.
    pub text: String,
    /// Trimmed, non-empty paragraphs in document order.
    pub paragraphs: Vec<String>,
    /// Number of grid columns the cell covers, at least 1.
    pub col_span: u32,
    /// Vertical merge marker.
    pub v_merge: VerticalMerge,
}

/// The rows of one top-level table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableBlock {
    /// Rows of cells, possibly of different lengths.
    pub rows: Vec<Vec<RawCell>>,
}

/// Everything the timetable pipeline reads from the document markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMarkup {
    /// Text runs before the first table, trimmed and joined by spaces.
    pub title: String,
    /// Top-level tables in document order.
    pub tables: Vec<TableBlock>,
}

/// Scan a document for its title and tables in one pass.
#[tracing::instrument(level = "debug", skip_all, fields(len = xml.len()))]
#[must_use]
pub fn scan_document(xml: &str) -> DocumentMarkup {
    let markup = scanner::scan(lexer::tokenize(xml));
    tracing::debug!(tables = markup.tables.len(), "document scanned");
    markup
}

/// Top-level tables of the document.
#[must_use]
pub fn extract_tables(xml: &str) -> Vec<TableBlock> {
    scan_document(xml).tables
}

/// Document text before the first table.
#[must_use]
pub fn extract_title(xml: &str) -> String {
    scan_document(xml).title
}

/// Content of a single `w:tc` fragment.
#[must_use]
pub fn extract_cell_content(xml: &str) -> RawCell {
    scanner::scan_cell(lexer::tokenize(xml))
}
