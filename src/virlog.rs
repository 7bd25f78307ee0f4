//! Log file container with memory-mapped file support.

use crate::diagnostic::Diagnostic;
use crate::error::{Result, VirlogError};
use crate::locator::RecordSpan;
use crate::record::{Layout, ParsedRecord, RecordParser};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, instrument};

#[cfg(feature = "multithreading")]
use rayon::prelude::*;

/// A loaded virlog file.
///
/// Holds the raw log bytes and the layout used to split them into records.
pub struct Virlog {
    /// Log data - either memory-mapped or owned.
    data: VirlogData,

    /// Record layout.
    layout: Layout,
}

/// Represents log data storage.
enum VirlogData {
    /// Memory-mapped file data.
    Mapped(Mmap),
    /// Owned data.
    Owned(Vec<u8>),
}

impl VirlogData {
    /// Returns a slice of the log data.
    fn as_slice(&self) -> &[u8] {
        match self {
            VirlogData::Mapped(mmap) => mmap,
            VirlogData::Owned(data) => data,
        }
    }
}

impl Virlog {
    /// Opens a virlog file using the marker-delimited layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use eset_virlog::Virlog;
    ///
    /// let virlog = Virlog::open("virlog.dat").unwrap();
    /// for record in virlog.parse() {
    ///     println!("{:?}", record.get("Infiltration"));
    /// }
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_layout(path, Layout::default())
    }

    /// Opens a virlog file using the given layout.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open_with_layout<P: AsRef<Path>>(path: P, layout: Layout) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(VirlogError::file_not_found(path));
        }

        info!("Opening virlog");
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();

        // Zero-length maps are rejected on some platforms
        if file_size == 0 {
            debug!("Empty file");
            return Ok(Self::from_vec(Vec::new()).with_layout(layout));
        }

        // SAFETY: The file is opened read-only, the map lives as long as the
        // Virlog that owns it, and every access goes through bounds-checked
        // slice operations.
        let mmap = unsafe { Mmap::map(&file)? };
        debug!(size = mmap.len(), "Memory mapped virlog file");

        Ok(Self {
            data: VirlogData::Mapped(mmap),
            layout,
        })
    }

    /// Creates a virlog from owned bytes using the marker-delimited layout.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data: VirlogData::Owned(data),
            layout: Layout::default(),
        }
    }

    /// Replaces the record layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Returns the record layout.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Returns the raw log bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Returns the output column names for this log's layout.
    pub fn header(&self) -> Vec<&'static str> {
        self.layout.header()
    }

    /// Locates every record in the log.
    pub fn records(&self) -> Vec<RecordSpan<'_>> {
        let spans = self.layout.locator().locate(self.as_bytes());
        debug!(count = spans.len(), layout = %self.layout, "Located records");
        spans
    }

    /// Locates and parses every record, in index order.
    pub fn parse(&self) -> Vec<ParsedRecord> {
        let spans = self.records();
        let parser = RecordParser::new(self.layout);

        #[cfg(feature = "multithreading")]
        let records: Vec<ParsedRecord> = spans.par_iter().map(|span| parser.parse(span)).collect();

        #[cfg(not(feature = "multithreading"))]
        let records: Vec<ParsedRecord> = spans.iter().map(|span| parser.parse(span)).collect();

        records
    }

    /// Parses every record and yields their diagnostics in index order.
    ///
    /// Within a record, locator diagnostics come before field diagnostics.
    pub fn diagnostics(&self) -> impl Iterator<Item = Diagnostic> {
        self.parse().into_iter().flat_map(|record| record.diagnostics)
    }
}
