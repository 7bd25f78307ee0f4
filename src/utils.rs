//! Utility functions for byte scanning and string conversion.

use crate::error::{Result, VirlogError};
use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::UTF_16LE;
use std::io::Cursor;

/// Returns the offset of the first occurrence of `needle` in `haystack`.
///
/// An empty needle matches at offset 0.
pub fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Like [`find_bytes`], but starts the search at `start` and returns an
/// offset relative to the start of `haystack`.
pub fn find_bytes_from(haystack: &[u8], needle: &[u8], start: usize) -> Option<usize> {
    let tail = haystack.get(start..)?;
    find_bytes(tail, needle).map(|pos| start + pos)
}

/// Returns the offsets of every non-overlapping occurrence of `needle`.
pub fn find_all(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    let mut positions = Vec::new();
    if needle.is_empty() {
        return positions;
    }

    let mut start = 0;
    while let Some(pos) = find_bytes_from(haystack, needle, start) {
        positions.push(pos);
        start = pos + needle.len();
    }
    positions
}

/// Decodes UTF-16LE bytes, replacing malformed sequences with U+FFFD.
///
/// Returns the decoded text and whether any replacement happened. A trailing
/// odd byte is ignored.
pub fn decode_utf16_lossy(data: &[u8]) -> (String, bool) {
    let even = &data[..data.len() - data.len() % 2];
    if even.is_empty() {
        return (String::new(), false);
    }

    let (decoded, had_errors) = UTF_16LE.decode_without_bom_handling(even);
    (decoded.into_owned(), had_errors)
}

/// Renders bytes as lowercase hexadecimal.
pub fn to_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Reads a u32 from a byte slice at the given offset.
pub fn read_u32_le(data: &[u8], offset: usize) -> Result<u32> {
    let end = offset.checked_add(4).filter(|&end| end <= data.len());
    let Some(end) = end else {
        return Err(VirlogError::truncated(offset, 4, data.len()));
    };

    let mut cursor = Cursor::new(&data[offset..end]);
    Ok(cursor.read_u32::<LittleEndian>()?)
}

/// Reads a u64 from a byte slice at the given offset.
pub fn read_u64_le(data: &[u8], offset: usize) -> Result<u64> {
    let end = offset.checked_add(8).filter(|&end| end <= data.len());
    let Some(end) = end else {
        return Err(VirlogError::truncated(offset, 8, data.len()));
    };

    let mut cursor = Cursor::new(&data[offset..end]);
    Ok(cursor.read_u64::<LittleEndian>()?)
}
