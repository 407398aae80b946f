// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, path::Path};

use tokio::fs;
use ttcal_core::{ArchiveReader, Diagnostics, ParseOptions, ParseResult, parse_with};

/// Read a timetable document from disk and parse it.
#[tracing::instrument(skip(options, diagnostics))]
pub async fn read_timetable(
    input: &Path,
    options: &ParseOptions,
    diagnostics: Option<&mut Diagnostics>,
) -> Result<ParseResult, Box<dyn Error>> {
    let bytes = fs::read(input)
        .await
        .map_err(|e| format!("Failed to read {}: {}", input.display(), e))?;
    tracing::debug!(len = bytes.len(), "timetable loaded");

    let result = parse_with(&bytes, options, &ArchiveReader::default(), diagnostics)?;
    tracing::debug!(
        events = result.events.len(),
        occurrences = result.occurrence_count(),
        "timetable parsed"
    );
    Ok(result)
}
