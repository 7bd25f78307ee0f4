//! Synthetic virlog fixtures.

#![allow(dead_code)]

use eset_virlog::field::{
    FIRSTSEEN_MARKER, INFILTRATION_MARKER, OBJECTHASH_MARKER, OBJECT_MARKER, PROGHASH_MARKER,
    PROGNAME_MARKER, USER_MARKER, VIRUSDB_MARKER,
};
use eset_virlog::locator::{INDEXED_RECORD_MARKER, RECORD_HEADER};

/// SHA-1 of the EICAR test file.
pub const EICAR_HASH: [u8; 20] = [
    0x33, 0x95, 0x85, 0x6c, 0xe8, 0x1f, 0x2b, 0x73, 0x82, 0xde, 0xe7, 0x26, 0x02, 0xf7, 0x98,
    0xb6, 0x42, 0xf1, 0x41, 0x40,
];

/// Hex form of [`EICAR_HASH`].
pub const EICAR_HASH_HEX: &str = "3395856ce81f2b7382dee72602f798b642f14140";

/// FILETIME of 2017-03-25T20:46:39Z.
pub const SAMPLE_FILETIME: u64 = 131349483990000000;

/// Unix time of 2017-03-25T20:46:39Z.
pub const SAMPLE_UNIX: u32 = 1490474799;

pub const SAMPLE_TIME_TEXT: &str = "2017-03-25T20:46:39Z";

/// Encodes text as UTF-16LE without a terminator.
pub fn utf16(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|unit| unit.to_le_bytes()).collect()
}

/// Builds the bytes of a single record.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    id: u32,
    second_id: u32,
    filetime: u64,
    body: Vec<u8>,
}

impl RecordBuilder {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            second_id: id,
            filetime: SAMPLE_FILETIME,
            body: Vec::new(),
        }
    }

    /// Overrides the copy of the ID stored at offset 16.
    pub fn second_id(mut self, id: u32) -> Self {
        self.second_id = id;
        self
    }

    pub fn filetime(mut self, filetime: u64) -> Self {
        self.filetime = filetime;
        self
    }

    /// Appends a wide string field with a well-formed prefix.
    pub fn wide(self, marker: &[u8], text: &str) -> Self {
        self.wide_with_reserved(marker, [0x00, 0x00], text)
    }

    /// Appends a wide string field whose reserved bytes are `reserved`.
    pub fn wide_with_reserved(mut self, marker: &[u8], reserved: [u8; 2], text: &str) -> Self {
        self.body.extend_from_slice(marker);
        self.body.extend_from_slice(&[0x02, 0x00]);
        self.body.extend_from_slice(&reserved);
        self.body.extend(utf16(text));
        self.body.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
        self
    }

    /// Appends a hash field.
    pub fn hash(mut self, marker: &[u8], hash: &[u8; 20]) -> Self {
        self.body.extend_from_slice(marker);
        self.body.extend_from_slice(&[0x14, 0x00, 0x00, 0x00]);
        self.body.extend_from_slice(hash);
        self
    }

    pub fn first_seen(mut self, seconds: u32) -> Self {
        self.body.extend_from_slice(&FIRSTSEEN_MARKER);
        self.body.extend_from_slice(&seconds.to_le_bytes());
        self
    }

    /// Appends arbitrary bytes.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(bytes);
        self
    }

    /// Fills in every field of a typical EICAR detection.
    pub fn eicar(self) -> Self {
        self.wide(&VIRUSDB_MARKER, "15153 (20170325)")
            .wide(&OBJECT_MARKER, "C:\\Users\\test\\Downloads\\eicar.com")
            .hash(&OBJECTHASH_MARKER, &EICAR_HASH)
            .wide(&INFILTRATION_MARKER, "@Teststring.Eicar")
            .wide(&USER_MARKER, "DESKTOP-1\\test")
            .wide(&PROGNAME_MARKER, "C:\\Windows\\explorer.exe")
            .hash(&PROGHASH_MARKER, &EICAR_HASH)
            .first_seen(SAMPLE_UNIX)
    }

    /// Record bytes in the marker-delimited layout, header included.
    pub fn build_delimited(&self) -> Vec<u8> {
        let mut data = RECORD_HEADER.to_vec();
        data.extend_from_slice(&self.id.to_le_bytes());
        data.extend_from_slice(&self.filetime.to_le_bytes());
        data.extend_from_slice(&[0x01, 0x00, 0x00, 0x00]);
        data.extend_from_slice(&self.second_id.to_le_bytes());
        data.extend_from_slice(&self.body);
        data
    }

    /// Record bytes in the indexed layout.
    pub fn build_indexed(&self) -> Vec<u8> {
        let mut data = self.id.to_le_bytes().to_vec();
        data.extend_from_slice(&INDEXED_RECORD_MARKER);
        data.extend_from_slice(&self.body);
        data
    }
}

/// File preamble preceding the first record.
pub fn preamble() -> Vec<u8> {
    let mut data = b"VLOG".to_vec();
    data.extend_from_slice(&[0x10, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00]);
    data
}

/// Two-record marker-delimited log, both records fully populated.
pub fn sample_log() -> Vec<u8> {
    let mut data = preamble();
    data.extend(RecordBuilder::new(0).eicar().build_delimited());
    data.extend(RecordBuilder::new(1).eicar().build_delimited());
    data
}

/// Two-record indexed log.
pub fn sample_indexed_log() -> Vec<u8> {
    let mut data = preamble();
    data.extend(RecordBuilder::new(0).eicar().build_indexed());
    data.extend(RecordBuilder::new(1).eicar().build_indexed());
    data
}
