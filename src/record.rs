//! Record parsing.
//!
//! A [`RecordParser`] applies a layout's fixed list of
//! [`FieldDescriptor`]s to each [`RecordSpan`], producing a
//! [`ParsedRecord`] with one value per column. Missing fields are empty
//! strings; nothing here ever fails.

use crate::diagnostic::Diagnostic;
use crate::field::{
    extract_field, FieldDescriptor, FIRST_SEEN, INFILTRATION, OBJECT, OBJECT_HASH, PROG_HASH,
    PROG_NAME, TIMESTAMP, USER, VIRUS_DB,
};
use crate::locator::{Indexed, MarkerDelimited, RecordLocator, RecordSpan};
use std::fmt;
use std::str::FromStr;

/// Name of the leading column holding the record index.
pub const ID_FIELD: &str = "ID";

/// Fields of a marker-delimited record, in output order.
pub const DELIMITED_FIELDS: [FieldDescriptor; 9] = [
    TIMESTAMP,
    VIRUS_DB,
    OBJECT,
    OBJECT_HASH,
    INFILTRATION,
    USER,
    PROG_NAME,
    PROG_HASH,
    FIRST_SEEN,
];

/// Fields of an indexed record, in output order.
pub const INDEXED_FIELDS: [FieldDescriptor; 8] = [
    VIRUS_DB,
    OBJECT,
    OBJECT_HASH,
    INFILTRATION,
    USER,
    PROG_NAME,
    PROG_HASH,
    FIRST_SEEN,
];

/// On-disk record layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Layout {
    /// Records separated by a fixed header.
    #[default]
    Delimited,

    /// Records introduced by their little-endian index.
    Indexed,
}

impl Layout {
    /// Returns the record locator for this layout.
    pub fn locator(&self) -> Box<dyn RecordLocator + Send + Sync> {
        match self {
            Layout::Delimited => Box::new(MarkerDelimited::default()),
            Layout::Indexed => Box::new(Indexed::default()),
        }
    }

    /// Returns the field descriptors for this layout, excluding the ID column.
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        match self {
            Layout::Delimited => &DELIMITED_FIELDS,
            Layout::Indexed => &INDEXED_FIELDS,
        }
    }

    /// Returns the column names, starting with [`ID_FIELD`].
    pub fn header(&self) -> Vec<&'static str> {
        std::iter::once(ID_FIELD)
            .chain(self.fields().iter().map(|field| field.name))
            .collect()
    }

    /// Returns the layout's name as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Layout::Delimited => "delimited",
            Layout::Indexed => "indexed",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "delimited" => Ok(Layout::Delimited),
            "indexed" => Ok(Layout::Indexed),
            other => Err(format!("unknown layout '{}'", other)),
        }
    }
}

/// One named column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    /// Column name.
    pub name: &'static str,

    /// Decoded text, empty when absent.
    pub value: String,
}

/// A fully parsed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    /// Sequential record index.
    pub index: u32,

    /// Column values in header order, starting with the index.
    pub fields: Vec<FieldValue>,

    /// Locator and field diagnostics in discovery order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedRecord {
    /// Iterates over the textual values in column order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.value.as_str())
    }

    /// Returns the value of the named column.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    /// Returns true if any column holds exactly `value`.
    pub fn contains(&self, value: &str) -> bool {
        self.values().any(|v| v == value)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ParsedRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(field.name, &field.value)?;
        }
        map.end()
    }
}

/// Parses record spans for one layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordParser {
    layout: Layout,
}

impl RecordParser {
    /// Creates a parser for `layout`.
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Returns the parser's layout.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Returns the column names.
    pub fn header(&self) -> Vec<&'static str> {
        self.layout.header()
    }

    /// Parses a located span, keeping the locator's diagnostics first.
    pub fn parse(&self, span: &RecordSpan<'_>) -> ParsedRecord {
        let mut record = self.parse_raw(span.index, span.data);
        if !span.diagnostics.is_empty() {
            let mut diagnostics = span.diagnostics.clone();
            diagnostics.append(&mut record.diagnostics);
            record.diagnostics = diagnostics;
        }
        record
    }

    /// Parses raw record bytes with the given index.
    pub fn parse_raw(&self, index: u32, data: &[u8]) -> ParsedRecord {
        let descriptors = self.layout.fields();
        let mut fields = Vec::with_capacity(descriptors.len() + 1);
        let mut diagnostics = Vec::new();

        fields.push(FieldValue {
            name: ID_FIELD,
            value: index.to_string(),
        });

        for descriptor in descriptors {
            let extracted = extract_field(descriptor, data);
            diagnostics.extend(extracted.diagnostics);
            fields.push(FieldValue {
                name: descriptor.name,
                value: extracted.value,
            });
        }

        ParsedRecord {
            index,
            fields,
            diagnostics,
        }
    }
}

/// Parses `data` as record `index` of the given layout.
pub fn parse_record(layout: Layout, index: u32, data: &[u8]) -> ParsedRecord {
    RecordParser::new(layout).parse_raw(index, data)
}
