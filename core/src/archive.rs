// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Locate the main document part of a Word package.
//!
//! Three container shapes are accepted:
//!
//! - a ZIP package (`.docx`), read with a minimal central directory walk
//!   that only understands the store and deflate methods;
//! - a Flat OPC XML file, where every part is inlined in `<pkg:part>`;
//! - a bare `document.xml`, returned unchanged.
//!
//! When the built-in ZIP reader fails, an optional [`FallbackDecoder`] gets
//! one attempt before the error is propagated.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, TimetableError};

/// Name of the main document part inside a ZIP package.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Name of the main document part inside a Flat OPC package.
const FLAT_OPC_DOCUMENT_PART: &str = "/word/document.xml";

const SIG_LOCAL_FILE_HEADER: u32 = 0x0403_4b50;
const SIG_CENTRAL_DIRECTORY: u32 = 0x0201_4b50;
const SIG_END_OF_CENTRAL_DIRECTORY: u32 = 0x0605_4b50;

const COMPRESSION_STORE: u16 = 0;
const COMPRESSION_DEFLATE: u16 = 8;

const LOCAL_HEADER_LEN: usize = 30;
const CENTRAL_HEADER_LEN: usize = 46;
const EOCD_MIN_LEN: usize = 22;
const EOCD_MAX_COMMENT_LEN: usize = 0xffff;

/// Raw document handed to the pipeline.
#[derive(Debug, Clone, Copy)]
pub enum DocumentInput<'a> {
    /// File content as uploaded.
    Bytes(&'a [u8]),
    /// File content already decoded as text.
    Text(&'a str),
}

impl<'a> From<&'a [u8]> for DocumentInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for DocumentInput<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for DocumentInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for DocumentInput<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

/// Secondary ZIP decoder, tried once when the built-in reader fails.
pub trait FallbackDecoder: fmt::Debug + Send + Sync {
    /// Read the entry `name` of the ZIP `archive` as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`TimetableError::MissingPart`] when the entry does not exist,
    /// or any other error when the archive cannot be decoded.
    fn read_entry(&self, archive: &[u8], name: &str) -> Result<String>;
}

/// Reads the document XML out of the supported containers.
#[derive(Debug, Clone)]
pub struct ArchiveReader {
    fallback: Option<Arc<dyn FallbackDecoder>>,
}

impl Default for ArchiveReader {
    /// A reader with the platform default fallback decoder, if this build has one.
    fn default() -> Self {
        Self {
            fallback: default_fallback(),
        }
    }
}

impl ArchiveReader {
    /// A reader that only uses the built-in ZIP reader.
    #[must_use]
    pub const fn without_fallback() -> Self {
        Self { fallback: None }
    }

    /// A reader that tries `fallback` when the built-in ZIP reader fails.
    #[must_use]
    pub fn with_fallback(fallback: Arc<dyn FallbackDecoder>) -> Self {
        Self {
            fallback: Some(fallback),
        }
    }

    /// Whether a fallback decoder is installed.
    #[must_use]
    pub const fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Return the XML text of the document part.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is too short, is not a recognized
    /// container, or the document part cannot be located or decompressed.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn read_document(&self, input: DocumentInput<'_>) -> Result<String> {
        let bytes = match input {
            DocumentInput::Text(text) => {
                if let Some(xml) = as_xml(text) {
                    return unwrap_xml(xml);
                }
                text.as_bytes()
            }
            DocumentInput::Bytes(bytes) => bytes,
        };

        if bytes.len() < 4 {
            return Err(TimetableError::InputTooShort { len: bytes.len() });
        }

        match read_u32(bytes, 0) {
            Some(SIG_LOCAL_FILE_HEADER | SIG_END_OF_CENTRAL_DIRECTORY) => {
                tracing::debug!(len = bytes.len(), "reading ZIP package");
                self.read_zip(bytes)
            }
            _ => {
                let text = decode_utf8(bytes);
                match as_xml(&text) {
                    Some(xml) => unwrap_xml(xml),
                    None => Err(TimetableError::UnrecognizedFormat),
                }
            }
        }
    }

    fn read_zip(&self, bytes: &[u8]) -> Result<String> {
        let err = match read_zip_entry(bytes, DOCUMENT_PART) {
            Ok(xml) => return Ok(xml),
            Err(err) => err,
        };

        let Some(fallback) = &self.fallback else {
            return Err(err);
        };

        tracing::debug!(%err, "built-in ZIP reader failed, trying fallback decoder");
        match fallback.read_entry(bytes, DOCUMENT_PART) {
            Ok(xml) => Ok(xml),
            Err(fallback_err) if err.is_archive_related() => {
                tracing::warn!(%fallback_err, "fallback decoder failed");
                Err(err)
            }
            Err(fallback_err) => Err(fallback_err),
        }
    }
}

#[cfg(feature = "zip-fallback")]
fn default_fallback() -> Option<Arc<dyn FallbackDecoder>> {
    Some(Arc::new(ZipCrateDecoder))
}

#[cfg(not(feature = "zip-fallback"))]
fn default_fallback() -> Option<Arc<dyn FallbackDecoder>> {
    None
}

/// Fallback decoder backed by the `zip` crate, which also understands ZIP64
/// and data descriptors.
#[cfg(feature = "zip-fallback")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipCrateDecoder;

#[cfg(feature = "zip-fallback")]
impl FallbackDecoder for ZipCrateDecoder {
    fn read_entry(&self, archive: &[u8], name: &str) -> Result<String> {
        use std::io::Read;

        let mut zip = zip::ZipArchive::new(std::io::Cursor::new(archive))
            .map_err(|e| TimetableError::Fallback(e.to_string()))?;

        let mut file = match zip.by_name(name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(TimetableError::MissingPart {
                    name: name.to_string(),
                });
            }
            Err(e) => return Err(TimetableError::Fallback(e.to_string())),
        };

        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .map_err(|e| TimetableError::Fallback(e.to_string()))?;
        Ok(decode_utf8(&buf).into_owned())
    }
}

/// Return the text from the XML declaration on, if it is an XML document.
fn as_xml(text: &str) -> Option<&str> {
    let trimmed = text.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    trimmed.starts_with("<?xml").then_some(trimmed)
}

fn unwrap_xml(xml: &str) -> Result<String> {
    if xml.contains("<pkg:package") {
        tracing::debug!("reading Flat OPC package");
        extract_flat_opc(xml).map(str::to_string)
    } else {
        Ok(xml.to_string())
    }
}

/// Find the inline XML of the document part in a Flat OPC package.
fn extract_flat_opc(xml: &str) -> Result<&str> {
    const PART_OPEN: &str = "<pkg:part";
    const PART_CLOSE: &str = "</pkg:part>";
    const DATA_OPEN: &str = "<pkg:xmlData>";
    const DATA_CLOSE: &str = "</pkg:xmlData>";

    let name_attr = format!("pkg:name=\"{FLAT_OPC_DOCUMENT_PART}\"");
    let mut rest = xml;
    while let Some(start) = rest.find(PART_OPEN) {
        let part = rest.get(start..).unwrap_or_default();
        let Some(tag_end) = part.find('>') else {
            break;
        };
        let (tag, after_tag) = part.split_at(tag_end + 1);
        if !tag.contains(&name_attr) {
            rest = after_tag;
            continue;
        }

        let Some(content_end) = after_tag.find(PART_CLOSE) else {
            break;
        };
        let content = after_tag.get(..content_end).unwrap_or_default();
        let missing_data = || TimetableError::MissingXmlData {
            name: FLAT_OPC_DOCUMENT_PART.to_string(),
        };
        let data_start = content.find(DATA_OPEN).ok_or_else(missing_data)? + DATA_OPEN.len();
        let data = content.get(data_start..).unwrap_or_default();
        let data_end = data.find(DATA_CLOSE).ok_or_else(missing_data)?;
        return Ok(data.get(..data_end).unwrap_or_default());
    }

    Err(TimetableError::MissingPart {
        name: FLAT_OPC_DOCUMENT_PART.to_string(),
    })
}

#[derive(Debug, Clone, Copy)]
struct ZipEntry {
    compression: u16,
    compressed_size: usize,
    local_header_offset: usize,
}

/// Read one entry of a ZIP archive without the help of any ZIP library.
fn read_zip_entry(bytes: &[u8], name: &str) -> Result<String> {
    let entry = locate_entry(bytes, name)?.ok_or_else(|| TimetableError::MissingPart {
        name: name.to_string(),
    })?;

    let offset = entry.local_header_offset;
    let corrupted = || TimetableError::CorruptedLocalHeader { offset };
    if read_u32(bytes, offset) != Some(SIG_LOCAL_FILE_HEADER) {
        return Err(corrupted());
    }
    let name_len = read_u16(bytes, offset + 26).ok_or_else(corrupted)?;
    let extra_len = read_u16(bytes, offset + 28).ok_or_else(corrupted)?;

    let data_start = offset + LOCAL_HEADER_LEN + usize::from(name_len) + usize::from(extra_len);
    let data = data_start
        .checked_add(entry.compressed_size)
        .and_then(|data_end| bytes.get(data_start..data_end))
        .ok_or_else(|| TimetableError::TruncatedEntry {
            name: name.to_string(),
        })?;

    tracing::trace!(
        compression = entry.compression,
        size = entry.compressed_size,
        "found {name}"
    );
    match entry.compression {
        COMPRESSION_STORE => Ok(decode_utf8(data).into_owned()),
        COMPRESSION_DEFLATE => {
            let inflated = inflate_raw(data, name)?;
            Ok(decode_utf8(&inflated).into_owned())
        }
        method => Err(TimetableError::UnsupportedCompression { method }),
    }
}

/// Walk the central directory looking for `name`.
fn locate_entry(bytes: &[u8], name: &str) -> Result<Option<ZipEntry>> {
    let eocd =
        find_end_of_central_directory(bytes).ok_or(TimetableError::MissingEndOfCentralDirectory)?;

    let total_entries = read_u16(bytes, eocd + 10).unwrap_or_default();
    let mut offset = read_u32(bytes, eocd + 16).map_or(usize::MAX, to_usize);
    for _ in 0..total_entries {
        let corrupted = TimetableError::CorruptedCentralDirectory { offset };
        if read_u32(bytes, offset) != Some(SIG_CENTRAL_DIRECTORY) {
            return Err(corrupted);
        }
        let (
            Some(compression),
            Some(compressed_size),
            Some(name_len),
            Some(extra_len),
            Some(comment_len),
            Some(local_header_offset),
        ) = (
            read_u16(bytes, offset + 10),
            read_u32(bytes, offset + 20),
            read_u16(bytes, offset + 28),
            read_u16(bytes, offset + 30),
            read_u16(bytes, offset + 32),
            read_u32(bytes, offset + 42),
        )
        else {
            return Err(corrupted);
        };

        let name_start = offset + CENTRAL_HEADER_LEN;
        let name_end = name_start + usize::from(name_len);
        let file_name = bytes.get(name_start..name_end).ok_or(corrupted)?;
        if file_name == name.as_bytes() {
            return Ok(Some(ZipEntry {
                compression,
                compressed_size: to_usize(compressed_size),
                local_header_offset: to_usize(local_header_offset),
            }));
        }

        offset = name_end + usize::from(extra_len) + usize::from(comment_len);
    }

    Ok(None)
}

/// Search backwards for the end of central directory record, which may be
/// followed by an archive comment of up to 64 KiB.
fn find_end_of_central_directory(bytes: &[u8]) -> Option<usize> {
    let last = bytes.len().checked_sub(EOCD_MIN_LEN)?;
    let first = last.saturating_sub(EOCD_MAX_COMMENT_LEN);
    (first..=last)
        .rev()
        .find(|&i| read_u32(bytes, i) == Some(SIG_END_OF_CENTRAL_DIRECTORY))
}

#[cfg(feature = "deflate")]
fn inflate_raw(data: &[u8], name: &str) -> Result<Vec<u8>> {
    use std::io::Read;

    let mut decoder = flate2::read::DeflateDecoder::new(data);
    let mut out = Vec::with_capacity(data.len().saturating_mul(4));
    decoder
        .read_to_end(&mut out)
        .map_err(|e| TimetableError::Inflate {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
    Ok(out)
}

#[cfg(not(feature = "deflate"))]
fn inflate_raw(_data: &[u8], _name: &str) -> Result<Vec<u8>> {
    Err(TimetableError::DecompressionUnavailable)
}

/// Lossy UTF-8 decoding without the byte order mark.
fn decode_utf8(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes)
}

fn read_u16(bytes: &[u8], offset: usize) -> Option<u16> {
    let end = offset.checked_add(2)?;
    let raw = bytes.get(offset..end)?;
    Some(u16::from_le_bytes(raw.try_into().ok()?))
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let end = offset.checked_add(4)?;
    let raw = bytes.get(offset..end)?;
    Some(u32::from_le_bytes(raw.try_into().ok()?))
}

fn to_usize(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
