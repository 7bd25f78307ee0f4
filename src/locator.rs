//! Record boundary detection.
//!
//! The log is a flat blob with no record table. Two on-disk layouts are
//! supported, each with its own [`RecordLocator`]:
//!
//! ```text
//! Marker-delimited:
//!   [preamble] HEADER[8] ID[4] FILETIME[8] ????[4] ID[4] fields...
//!              HEADER[8] ID[4] ...
//!
//! Indexed:
//!   [preamble] 00000000 MARKER[4] fields... 01000000 MARKER[4] fields...
//! ```

use crate::diagnostic::Diagnostic;
use crate::utils::{find_all, find_bytes_from, read_u32_le};
use tracing::debug;

/// Header separating records in the marker-delimited layout.
pub const RECORD_HEADER: [u8; 8] = [0x24, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00];

/// Marker following the little-endian record index in the indexed layout.
pub const INDEXED_RECORD_MARKER: [u8; 4] = [0x01, 0x00, 0x01, 0x00];

/// Offsets of the two copies of the record ID in a marker-delimited record.
const ID_OFFSETS: [usize; 2] = [0, 16];

/// One record's bytes within the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSpan<'a> {
    /// Sequential record index, starting at 0.
    pub index: u32,

    /// Offset of `data` from the start of the log.
    pub offset: usize,

    /// Record bytes.
    pub data: &'a [u8],

    /// Anomalies noticed while locating this record.
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> RecordSpan<'a> {
    /// Creates a span with no diagnostics.
    pub fn new(index: u32, offset: usize, data: &'a [u8]) -> Self {
        Self {
            index,
            offset,
            data,
            diagnostics: Vec::new(),
        }
    }

    /// Length of the record in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the record has no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Splits a log into record spans.
///
/// Spans come back in discovery order, do not overlap, and run from the
/// first recognized record to the end of the blob.
pub trait RecordLocator {
    /// Locates every record in `blob`.
    fn locate<'a>(&self, blob: &'a [u8]) -> Vec<RecordSpan<'a>>;
}

/// Locator for logs whose records are separated by [`RECORD_HEADER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerDelimited {
    header: &'static [u8],
}

impl MarkerDelimited {
    /// Creates a locator splitting on `header`.
    pub const fn new(header: &'static [u8]) -> Self {
        Self { header }
    }

    /// Checks both embedded IDs against the sequential index.
    ///
    /// Emits at most one diagnostic per record.
    fn check_id(index: u32, data: &[u8]) -> Option<Diagnostic> {
        let matches = ID_OFFSETS
            .iter()
            .all(|&offset| read_u32_le(data, offset).map_or(false, |id| id == index));

        if matches {
            None
        } else {
            debug!(index, "Embedded record ID does not match index");
            Some(Diagnostic::UnexpectedBytes { field: "ID" })
        }
    }
}

impl Default for MarkerDelimited {
    fn default() -> Self {
        Self::new(&RECORD_HEADER)
    }
}

impl RecordLocator for MarkerDelimited {
    fn locate<'a>(&self, blob: &'a [u8]) -> Vec<RecordSpan<'a>> {
        let starts = find_all(blob, self.header);
        debug!(count = starts.len(), "Found record headers");

        let mut spans = Vec::with_capacity(starts.len());
        for (index, (i, &start)) in (0u32..).zip(starts.iter().enumerate()) {
            let data_start = start + self.header.len();
            let data_end = starts.get(i + 1).copied().unwrap_or(blob.len());

            let mut span = RecordSpan::new(index, data_start, &blob[data_start..data_end]);
            span.diagnostics.extend(Self::check_id(index, span.data));
            spans.push(span);
        }
        spans
    }
}

/// Locator for logs whose records start with their own index.
///
/// Record N ends where `index(N + 1) ++ marker` is found. The scan stops at
/// the first missing index, so a gap in the numbering ends the log early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indexed {
    marker: &'static [u8],
}

impl Indexed {
    /// Creates a locator probing for `index ++ marker`.
    pub const fn new(marker: &'static [u8]) -> Self {
        Self { marker }
    }

    /// Finds `index ++ marker` at or after `from`.
    fn probe(&self, blob: &[u8], index: u32, from: usize) -> Option<usize> {
        let mut needle = Vec::with_capacity(4 + self.marker.len());
        needle.extend_from_slice(&index.to_le_bytes());
        needle.extend_from_slice(self.marker);
        find_bytes_from(blob, &needle, from)
    }
}

impl Default for Indexed {
    fn default() -> Self {
        Self::new(&INDEXED_RECORD_MARKER)
    }
}

impl RecordLocator for Indexed {
    fn locate<'a>(&self, blob: &'a [u8]) -> Vec<RecordSpan<'a>> {
        let mut spans = Vec::new();

        let Some(mut start) = self.probe(blob, 0, 0) else {
            debug!("No first record found");
            return spans;
        };

        let mut index = 0u32;
        loop {
            let next = index
                .checked_add(1)
                .and_then(|next_index| self.probe(blob, next_index, start));

            match next {
                Some(end) => {
                    spans.push(RecordSpan::new(index, start, &blob[start..end]));
                    start = end;
                    index += 1;
                }
                None => {
                    spans.push(RecordSpan::new(index, start, &blob[start..]));
                    break;
                }
            }
        }

        debug!(count = spans.len(), "Located indexed records");
        spans
    }
}
