//! Field descriptors and the marker-scanning field extractor.
//!
//! Records carry no length-prefixed structure. Each field is found by
//! searching the record for a short marker and decoding the bytes after it
//! according to the field's [`FieldKind`]:
//!
//! ```text
//! WideString:    marker[4] ?? 00 00 UTF-16LE text ... 00 00 00
//! FixedHash:     marker[4] ?? 00 00 hash[20]
//! UnixTimestamp: marker[4] seconds[4]
//! WinTimestamp:  filetime[8] at a fixed record offset
//! ```

use crate::diagnostic::Diagnostic;
use crate::timestamp::{unix_timestamp_to_text, windows_to_unix};
use crate::utils::{decode_utf16_lossy, find_bytes, read_u32_le, read_u64_le, to_hex};
use tracing::debug;

/// Marker preceding the scanned object's path.
pub const OBJECT_MARKER: [u8; 4] = [0xbe, 0x0b, 0x4e, 0x00];

/// Marker preceding the detected threat name.
pub const INFILTRATION_MARKER: [u8; 4] = [0x4d, 0x1d, 0x4e, 0x00];

/// Marker preceding the account name.
pub const USER_MARKER: [u8; 4] = [0xee, 0x03, 0x4e, 0x00];

/// Marker preceding the detection engine version.
pub const VIRUSDB_MARKER: [u8; 4] = [0x17, 0x27, 0x4e, 0x00];

/// Marker preceding the path of the program that touched the object.
pub const PROGNAME_MARKER: [u8; 4] = [0xc4, 0x0b, 0x4e, 0x00];

/// Marker preceding the program's SHA-1.
pub const PROGHASH_MARKER: [u8; 4] = [0x9d, 0x13, 0x42, 0x00];

/// Marker preceding the object's SHA-1.
pub const OBJECTHASH_MARKER: [u8; 4] = [0x9e, 0x13, 0x42, 0x00];

/// Marker preceding the first-seen Unix timestamp.
pub const FIRSTSEEN_MARKER: [u8; 4] = [0x9f, 0x13, 0x46, 0x00];

/// Length of the `?? 00 00` block between a marker and its payload.
pub const PREFIX_LEN: usize = 4;

/// Length of a [`FieldKind::FixedHash`] payload.
pub const HASH_LEN: usize = 20;

/// Terminator searched for at the end of a wide string.
const WIDE_TERMINATOR: [u8; 3] = [0x00, 0x00, 0x00];

/// Decoding rule for a field payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Null-terminated UTF-16LE text.
    WideString,

    /// 20 raw bytes rendered as lowercase hex.
    FixedHash,

    /// 8-byte little-endian Windows FILETIME.
    WinTimestamp,

    /// 4-byte little-endian Unix time.
    UnixTimestamp,
}

impl FieldKind {
    /// Number of bytes between the marker and the payload.
    pub fn prefix_len(&self) -> usize {
        match self {
            FieldKind::WideString | FieldKind::FixedHash => PREFIX_LEN,
            FieldKind::WinTimestamp | FieldKind::UnixTimestamp => 0,
        }
    }
}

/// Where a field starts inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Immediately after the first occurrence of these bytes.
    Marker(&'static [u8]),

    /// At a fixed offset from the start of the record.
    Offset(usize),
}

/// Describes how to extract one named field from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Column name.
    pub name: &'static str,

    /// How the field is located.
    pub anchor: Anchor,

    /// How the payload is decoded.
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Creates a descriptor for a field introduced by `marker`.
    pub const fn marker(name: &'static str, marker: &'static [u8], kind: FieldKind) -> Self {
        Self {
            name,
            anchor: Anchor::Marker(marker),
            kind,
        }
    }

    /// Creates a descriptor for a field stored at a fixed record offset.
    pub const fn offset(name: &'static str, offset: usize, kind: FieldKind) -> Self {
        Self {
            name,
            anchor: Anchor::Offset(offset),
            kind,
        }
    }
}

/// Record timestamp, stored after the record ID.
pub const TIMESTAMP: FieldDescriptor = FieldDescriptor::offset("Timestamp", 4, FieldKind::WinTimestamp);
/// Detection engine version.
pub const VIRUS_DB: FieldDescriptor =
    FieldDescriptor::marker("VirusDB", &VIRUSDB_MARKER, FieldKind::WideString);
/// Scanned object.
pub const OBJECT: FieldDescriptor = FieldDescriptor::marker("Object", &OBJECT_MARKER, FieldKind::WideString);
/// SHA-1 of the scanned object.
pub const OBJECT_HASH: FieldDescriptor =
    FieldDescriptor::marker("ObjectHash", &OBJECTHASH_MARKER, FieldKind::FixedHash);
/// Threat name.
pub const INFILTRATION: FieldDescriptor =
    FieldDescriptor::marker("Infiltration", &INFILTRATION_MARKER, FieldKind::WideString);
/// Account name.
pub const USER: FieldDescriptor = FieldDescriptor::marker("User", &USER_MARKER, FieldKind::WideString);
/// Program that accessed the object.
pub const PROG_NAME: FieldDescriptor =
    FieldDescriptor::marker("ProgName", &PROGNAME_MARKER, FieldKind::WideString);
/// SHA-1 of that program.
pub const PROG_HASH: FieldDescriptor =
    FieldDescriptor::marker("ProgHash", &PROGHASH_MARKER, FieldKind::FixedHash);
/// When the object was first seen.
pub const FIRST_SEEN: FieldDescriptor =
    FieldDescriptor::marker("FirstSeen", &FIRSTSEEN_MARKER, FieldKind::UnixTimestamp);

/// Outcome of extracting one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    /// Decoded text, empty if the field is absent or unreadable.
    pub value: String,

    /// Whether the field's anchor was found in the record.
    pub found: bool,

    /// Anomalies noticed while extracting.
    pub diagnostics: Vec<Diagnostic>,
}

impl Extracted {
    fn not_found(field: &'static str) -> Self {
        Self {
            value: String::new(),
            found: false,
            diagnostics: vec![Diagnostic::FieldNotFound { field }],
        }
    }
}

/// Extracts the field described by `descriptor` from `record`.
///
/// Never fails: a missing marker yields an empty value and a
/// [`Diagnostic::FieldNotFound`]; malformed bytes yield warnings and a
/// best-effort value.
///
/// # Examples
///
/// ```rust
/// use eset_virlog::field::{extract_field, FIRST_SEEN, FIRSTSEEN_MARKER};
///
/// let mut record = FIRSTSEEN_MARKER.to_vec();
/// record.extend_from_slice(&1490474799u32.to_le_bytes());
///
/// let extracted = extract_field(&FIRST_SEEN, &record);
/// assert_eq!(extracted.value, "2017-03-25T20:46:39Z");
/// assert!(extracted.diagnostics.is_empty());
/// ```
pub fn extract_field(descriptor: &FieldDescriptor, record: &[u8]) -> Extracted {
    let field = descriptor.name;

    let start = match descriptor.anchor {
        Anchor::Marker(marker) => match find_bytes(record, marker) {
            Some(pos) => pos + marker.len(),
            None => {
                debug!(field, "Field marker not found");
                return Extracted::not_found(field);
            }
        },
        Anchor::Offset(offset) => offset,
    };

    let mut diagnostics = Vec::new();

    let prefix_len = descriptor.kind.prefix_len();
    if prefix_len > 0 {
        // Bytes 0..2 of the prefix vary; bytes 2..4 are always zero
        if record.get(start + 2..start + prefix_len) != Some(&[0x00, 0x00][..]) {
            debug!(field, offset = start, "Unexpected prefix bytes");
            diagnostics.push(Diagnostic::UnexpectedBytes { field });
        }
    }

    let payload = record.get(start + prefix_len..).unwrap_or_default();

    let value = match descriptor.kind {
        FieldKind::WideString => {
            let (text, had_errors) = decode_wide_string(payload);
            if had_errors {
                diagnostics.push(Diagnostic::InvalidUtf16 { field });
            }
            Some(text)
        }
        FieldKind::FixedHash => match payload.get(..HASH_LEN) {
            Some(hash) => Some(to_hex(hash)),
            None => {
                debug!(field, len = payload.len(), "Hash truncated");
                diagnostics.push(Diagnostic::UnexpectedBytes { field });
                Some(to_hex(payload))
            }
        },
        FieldKind::WinTimestamp => read_u64_le(payload, 0)
            .ok()
            .and_then(|ticks| unix_timestamp_to_text(windows_to_unix(ticks))),
        FieldKind::UnixTimestamp => read_u32_le(payload, 0)
            .ok()
            .and_then(|seconds| unix_timestamp_to_text(i64::from(seconds))),
    };

    let value = value.unwrap_or_else(|| {
        debug!(field, len = payload.len(), "Payload truncated or out of range");
        diagnostics.push(Diagnostic::UnexpectedBytes { field });
        String::new()
    });

    Extracted {
        value,
        found: true,
        diagnostics,
    }
}

/// Decodes a wide string running up to the first `00 00 00` triple.
///
/// The first zero of the triple is the high byte of the last UTF-16 unit,
/// so the text ends one byte past the triple's offset. Without a terminator
/// the string is empty.
fn decode_wide_string(payload: &[u8]) -> (String, bool) {
    match find_bytes(payload, &WIDE_TERMINATOR) {
        Some(pos) => decode_utf16_lossy(&payload[..pos + 1]),
        None => (String::new(), false),
    }
}
