// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Reconstruct a dense row × column grid from table rows with merged cells.
//!
//! A cell that spans several columns (`w:gridSpan`) or rows (`w:vMerge`)
//! is stored once; every grid position it covers holds the same
//! [`CellId`].

use crate::error::{Result, TimetableError};
use crate::markup::{RawCell, VerticalMerge};

/// Widest header accepted, in grid columns. Word tables stop at 63.
pub const MAX_COLUMNS: usize = 64;

/// Handle of a cell stored in a [`Grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(usize);

/// A logical cell of the grid and the position it is anchored at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    /// Cell text, paragraphs joined by `\n`.
    pub text: String,
    /// Non-empty paragraphs.
    pub paragraphs: Vec<String>,
    /// Columns covered in the anchor row.
    pub col_span: u32,
    /// Merge marker of the source cell.
    pub v_merge: VerticalMerge,
    /// Row of the top-left position.
    pub row: usize,
    /// Column of the top-left position.
    pub column: usize,
}

impl GridCell {
    /// Whether `(row, column)` is the top-left position of this cell.
    #[must_use]
    pub const fn is_anchor(&self, row: usize, column: usize) -> bool {
        self.row == row && self.column == column
    }
}

/// Dense grid of cell handles.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    cells: Vec<GridCell>,
    slots: Vec<Vec<Option<CellId>>>,
    columns: usize,
}

impl Grid {
    /// Expand column spans and vertical merges of `rows`.
    ///
    /// The number of columns is the span sum of the first row. Cells that
    /// would extend past it are clipped.
    ///
    /// # Errors
    ///
    /// Returns [`TimetableError::EmptyTable`] when there are no rows,
    /// [`TimetableError::TableTooWide`] when the header spans more than
    /// [`MAX_COLUMNS`] columns, and [`TimetableError::BrokenMerge`] when a
    /// cell continues a vertical merge that was never started.
    #[tracing::instrument(level = "debug", skip_all, fields(rows = rows.len()))]
    pub fn build(rows: &[Vec<RawCell>]) -> Result<Self> {
        let header = rows.first().ok_or(TimetableError::EmptyTable)?;
        let width: u64 = header.iter().map(|cell| u64::from(cell.col_span.max(1))).sum();
        let columns = usize::try_from(width)
            .ok()
            .filter(|&columns| columns <= MAX_COLUMNS)
            .ok_or(TimetableError::TableTooWide { columns: width })?;

        let mut grid = Self {
            cells: Vec::new(),
            slots: Vec::with_capacity(rows.len()),
            columns,
        };

        // Cell that fills a column in the following rows, if any.
        let mut active: Vec<Option<CellId>> = vec![None; columns];
        for (row_index, row) in rows.iter().enumerate() {
            let mut slots: Vec<Option<CellId>> = vec![None; columns];
            let mut cursor: usize = 0;
            for cell in row {
                let span = span_of(cell);
                if cell.v_merge == VerticalMerge::Continue {
                    for column in cursor..cursor.saturating_add(span).min(columns) {
                        let id = active
                            .get(column)
                            .copied()
                            .flatten()
                            .ok_or(TimetableError::BrokenMerge {
                                row: row_index,
                                column,
                            })?;
                        set(&mut slots, column, Some(id));
                    }
                } else if cursor < columns {
                    let id = grid.push(cell, row_index, cursor);
                    let source = (cell.v_merge == VerticalMerge::Restart).then_some(id);
                    for column in cursor..cursor.saturating_add(span).min(columns) {
                        set(&mut slots, column, Some(id));
                        set(&mut active, column, source);
                    }
                } else {
                    tracing::debug!(row = row_index, cursor, "cell beyond the header width");
                }
                cursor = cursor.saturating_add(span);
            }

            for (slot, source) in slots.iter_mut().zip(active.iter_mut()) {
                if slot.is_none() {
                    *slot = *source;
                }
                if slot.is_none() {
                    *source = None;
                }
            }
            grid.slots.push(slots);
        }

        tracing::debug!(
            rows = grid.row_count(),
            columns,
            cells = grid.cells.len(),
            "grid built"
        );
        Ok(grid)
    }

    fn push(&mut self, cell: &RawCell, row: usize, column: usize) -> CellId {
        let id = CellId(self.cells.len());
        self.cells.push(GridCell {
            text: cell.text.clone(),
            paragraphs: cell.paragraphs.clone(),
            col_span: cell.col_span.max(1),
            v_merge: cell.v_merge,
            row,
            column,
        });
        id
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of columns, the span sum of the header row.
    #[must_use]
    pub const fn column_count(&self) -> usize {
        self.columns
    }

    /// Handle of the cell at `(row, column)`.
    #[must_use]
    pub fn id_at(&self, row: usize, column: usize) -> Option<CellId> {
        self.slots.get(row)?.get(column).copied().flatten()
    }

    /// Cell at `(row, column)`.
    #[must_use]
    pub fn cell_at(&self, row: usize, column: usize) -> Option<&GridCell> {
        self.id_at(row, column).and_then(|id| self.cell(id))
    }

    /// Cell behind a handle.
    #[must_use]
    pub fn cell(&self, id: CellId) -> Option<&GridCell> {
        self.cells.get(id.0)
    }

    /// Last row in which `column` still maps to the cell found at
    /// `(row, column)`. Returns `row` itself for cells without a vertical
    /// merge.
    #[must_use]
    pub fn find_end_row(&self, row: usize, column: usize) -> usize {
        let Some(id) = self.id_at(row, column) else {
            return row;
        };

        let mut end = row;
        while self.id_at(end + 1, column) == Some(id) {
            end += 1;
        }
        end
    }
}

fn span_of(cell: &RawCell) -> usize {
    usize::try_from(cell.col_span.max(1)).unwrap_or(1)
}

fn set(slots: &mut [Option<CellId>], column: usize, value: Option<CellId>) {
    if let Some(slot) = slots.get_mut(column) {
        *slot = value;
    }
}
