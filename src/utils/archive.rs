//! Zip container helpers for the Word and Pages parsers.

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::parsers::ParseError;

/// Local file header signature every zip container starts with
pub const ZIP_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// A zip archive opened over an in-memory buffer
pub type MemoryArchive<'a> = ZipArchive<Cursor<&'a [u8]>>;

/// Check whether a buffer begins with the zip local file header
pub fn has_zip_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(&ZIP_SIGNATURE)
}

/// Open a zip archive over borrowed bytes
pub fn open_archive(bytes: &[u8]) -> Result<MemoryArchive<'_>, ParseError> {
    Ok(ZipArchive::new(Cursor::new(bytes))?)
}

/// Resolve an entry name: exact match first, then a case-insensitive match
/// on the path or its suffix (some exporters nest content one level deep)
pub fn find_entry(archive: &MemoryArchive<'_>, name: &str) -> Option<String> {
    if archive.index_for_name(name).is_some() {
        return Some(name.to_string());
    }

    let wanted = name.to_lowercase();
    let suffix = format!("/{}", wanted);
    archive
        .file_names()
        .find(|entry| {
            let entry = entry.to_lowercase();
            entry == wanted || entry.ends_with(&suffix)
        })
        .map(str::to_string)
}

/// Whether any entry name satisfies the predicate
pub fn any_entry(archive: &MemoryArchive<'_>, predicate: impl Fn(&str) -> bool) -> bool {
    archive.file_names().any(predicate)
}

/// Largest decompressed entry the parsers will read
pub const MAX_ENTRY_BYTES: u64 = 256 * 1024 * 1024;

/// Read a whole entry as bytes, up to [`MAX_ENTRY_BYTES`]
pub fn read_entry_bytes(archive: &mut MemoryArchive<'_>, name: &str) -> Result<Vec<u8>, ParseError> {
    read_entry_bytes_limited(archive, name, MAX_ENTRY_BYTES)
}

/// Read a whole entry as bytes, failing once more than `limit` bytes decompress.
///
/// The size declared in the archive header is never trusted for allocation.
pub fn read_entry_bytes_limited(
    archive: &mut MemoryArchive<'_>,
    name: &str,
    limit: u64,
) -> Result<Vec<u8>, ParseError> {
    let mut entry = archive.by_name(name)?;
    let mut buffer = Vec::new();
    (&mut entry)
        .take(limit.saturating_add(1))
        .read_to_end(&mut buffer)
        .map_err(|e| ParseError::Container(format!("failed to read entry {}: {}", name, e)))?;

    if buffer.len() as u64 > limit {
        return Err(ParseError::Container(format!(
            "entry {} is larger than {} bytes when decompressed",
            name, limit
        )));
    }
    Ok(buffer)
}

/// Read a whole entry as UTF-8 text (invalid sequences are replaced)
pub fn read_entry_string(archive: &mut MemoryArchive<'_>, name: &str) -> Result<String, ParseError> {
    let bytes = read_entry_bytes(archive, name)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
