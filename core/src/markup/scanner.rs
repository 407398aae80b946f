// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Token-driven state machine that turns the markup token stream into the
//! document title and table blocks.

use std::borrow::Cow;

use crate::markup::lexer::{Tag, Token, end_tag_name};
use crate::markup::{DocumentMarkup, RawCell, TableBlock, VerticalMerge};

const TABLE: &str = "w:tbl";
const ROW: &str = "w:tr";
const CELL: &str = "w:tc";
const PARAGRAPH: &str = "w:p";
const TEXT: &str = "w:t";
const GRID_SPAN: &str = "w:gridSpan";
const VERTICAL_MERGE: &str = "w:vMerge";

/// Scan a token stream into the title and the top-level tables.
pub fn scan<'src>(tokens: impl IntoIterator<Item = Token<'src>>) -> DocumentMarkup {
    let mut scanner = DocumentScanner::default();
    for token in tokens {
        scanner.feed(token);
    }
    scanner.finish()
}

/// Scan the tokens of a single cell fragment. Row and table tags are ignored.
pub fn scan_cell<'src>(tokens: impl IntoIterator<Item = Token<'src>>) -> RawCell {
    let mut cell = CellBuilder::default();
    for token in tokens {
        match token {
            Token::StartTag(raw) => cell.start(Tag::parse(raw)),
            Token::EndTag(raw) => cell.end(end_tag_name(raw)),
            Token::Text(raw) => cell.text(raw),
            Token::ProcessingInstruction | Token::Declaration | Token::Error => {}
        }
    }
    cell.finish()
}

#[derive(Debug, Default)]
struct DocumentScanner {
    title: Vec<String>,
    title_run: RunBuffer,
    seen_table: bool,
    tables: Vec<TableBlock>,
    /// `w:tbl` nesting level, 0 outside of any table
    depth: usize,
    rows: Vec<Vec<RawCell>>,
    row: Option<Vec<RawCell>>,
    cell: Option<CellBuilder>,
}

impl DocumentScanner {
    fn feed(&mut self, token: Token<'_>) {
        match token {
            Token::StartTag(raw) => self.start(Tag::parse(raw)),
            Token::EndTag(raw) => self.end(end_tag_name(raw)),
            Token::Text(raw) => self.text(raw),
            Token::ProcessingInstruction | Token::Declaration | Token::Error => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        if tag.name == TABLE {
            self.seen_table = true;
            if tag.self_closing {
                if self.depth == 0 {
                    self.tables.push(TableBlock::default());
                }
            } else {
                self.depth += 1;
            }
            return;
        }

        match self.depth {
            0 if !self.seen_table && tag.name == TEXT => self.title_run.open(&tag),
            1 => self.start_in_table(&tag),
            _ => {}
        }
    }

    fn start_in_table(&mut self, tag: &Tag<'_>) {
        match tag.name {
            ROW => {
                self.close_row();
                self.row = Some(Vec::new());
                if tag.self_closing {
                    self.close_row();
                }
            }
            CELL => {
                self.close_cell();
                self.cell = Some(CellBuilder::default());
                if tag.self_closing {
                    self.close_cell();
                }
            }
            _ => {
                if let Some(cell) = &mut self.cell {
                    cell.start(*tag);
                }
            }
        }
    }

    fn end(&mut self, name: &str) {
        if name == TABLE {
            match self.depth {
                0 => {}
                1 => {
                    self.close_table();
                    self.depth = 0;
                }
                _ => self.depth -= 1,
            }
            return;
        }

        match self.depth {
            0 if name == TEXT => {
                if let Some(run) = self.title_run.close() {
                    let run = run.trim();
                    if !run.is_empty() {
                        self.title.push(run.to_string());
                    }
                }
            }
            1 => match name {
                ROW => self.close_row(),
                CELL => self.close_cell(),
                _ => {
                    if let Some(cell) = &mut self.cell {
                        cell.end(name);
                    }
                }
            },
            _ => {}
        }
    }

    fn text(&mut self, raw: &str) {
        match self.depth {
            0 => self.title_run.push(raw),
            1 => {
                if let Some(cell) = &mut self.cell {
                    cell.text(raw);
                }
            }
            _ => {}
        }
    }

    fn close_cell(&mut self) {
        if let Some(cell) = self.cell.take() {
            self.row.get_or_insert_with(Vec::new).push(cell.finish());
        }
    }

    fn close_row(&mut self) {
        self.close_cell();
        if let Some(row) = self.row.take() {
            self.rows.push(row);
        }
    }

    fn close_table(&mut self) {
        self.close_row();
        let rows = std::mem::take(&mut self.rows);
        tracing::trace!(rows = rows.len(), "table closed");
        self.tables.push(TableBlock { rows });
    }

    fn finish(mut self) -> DocumentMarkup {
        if self.depth > 0 {
            tracing::debug!("table not closed at end of document");
            self.close_table();
        }

        DocumentMarkup {
            title: self.title.join(" "),
            tables: self.tables,
        }
    }
}

/// Content of one `w:tc` under construction.
#[derive(Debug, Default)]
struct CellBuilder {
    paragraphs: Vec<String>,
    paragraph: Option<String>,
    run: RunBuffer,
    col_span: Option<u32>,
    v_merge: VerticalMerge,
}

impl CellBuilder {
    fn start(&mut self, tag: Tag<'_>) {
        match tag.name {
            PARAGRAPH if !tag.self_closing => {
                self.close_paragraph();
                self.paragraph = Some(String::new());
            }
            TEXT if self.paragraph.is_some() => self.run.open(&tag),
            GRID_SPAN => {
                self.col_span = tag
                    .attribute("w:val")
                    .and_then(|v| v.trim().parse::<u32>().ok());
            }
            VERTICAL_MERGE => {
                self.v_merge = match tag.attribute("w:val") {
                    None | Some("continue") => VerticalMerge::Continue,
                    Some("restart") => VerticalMerge::Restart,
                    Some(_) => VerticalMerge::None,
                };
            }
            _ => {}
        }
    }

    fn end(&mut self, name: &str) {
        match name {
            PARAGRAPH => self.close_paragraph(),
            TEXT => {
                if let (Some(run), Some(paragraph)) = (self.run.close(), &mut self.paragraph) {
                    paragraph.push_str(&run);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, raw: &str) {
        self.run.push(raw);
    }

    fn close_paragraph(&mut self) {
        self.end(TEXT);
        if let Some(paragraph) = self.paragraph.take() {
            let paragraph = paragraph.replace('\u{b}', "\n");
            let paragraph = paragraph.trim();
            if !paragraph.is_empty() {
                self.paragraphs.push(paragraph.to_string());
            }
        }
    }

    fn finish(mut self) -> RawCell {
        self.close_paragraph();
        RawCell {
            text: self.paragraphs.join("\n"),
            paragraphs: self.paragraphs,
            col_span: self.col_span.unwrap_or(1).max(1),
            v_merge: self.v_merge,
        }
    }
}

/// Collects the character data of one `w:t` element.
#[derive(Debug, Default)]
struct RunBuffer {
    text: Option<String>,
}

impl RunBuffer {
    fn open(&mut self, tag: &Tag<'_>) {
        if !tag.self_closing {
            self.text = Some(String::new());
        }
    }

    fn push(&mut self, raw: &str) {
        if let Some(text) = &mut self.text {
            text.push_str(&decode_entities(raw));
        }
    }

    fn close(&mut self) -> Option<String> {
        self.text.take()
    }
}

/// Decode predefined and numeric entities, keeping the raw text when it
/// contains an unknown or malformed reference.
fn decode_entities(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::unescape(raw).unwrap_or(Cow::Borrowed(raw))
}
