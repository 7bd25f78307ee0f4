//! # ESET virlog.dat Parser
//!
//! Parses the detection log written by ESET (NOD32) antivirus products into
//! structured records.
//!
//! ## Format
//!
//! The log has no published layout. Records are found by scanning for a
//! fixed header, and fields inside a record are found by scanning for short
//! markers rather than by offset:
//!
//! ```text
//! [Preamble]
//! [Record Header - 24 00 00 00 01 00 01 00]
//!   - ID (u32 LE)
//!   - Timestamp (FILETIME, u64 LE)
//!   - 4 unknown bytes
//!   - ID again (u32 LE)
//!   - Marked fields, in any order:
//!       marker[4] ?? 00 00 UTF-16LE text 00 00   (VirusDB, Object, ...)
//!       marker[4] ?? 00 00 SHA-1[20]             (ObjectHash, ProgHash)
//!       marker[4] Unix time[4]                   (FirstSeen)
//! [Record Header]
//!   ...
//! ```
//!
//! Missing fields and odd bytes are reported as [`Diagnostic`]s attached to
//! each [`ParsedRecord`]; they never stop parsing.
//!
//! ## Examples
//!
//! ```no_run
//! use eset_virlog::{output, Virlog};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let virlog = Virlog::open("virlog.dat")?;
//! let records = virlog.parse();
//!
//! for record in &records {
//!     for diagnostic in &record.diagnostics {
//!         eprintln!("{}", diagnostic);
//!     }
//! }
//!
//! println!("{}", output::render_text(&virlog.header(), &records));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod diagnostic;
pub mod error;
pub mod field;
pub mod locator;
pub mod output;
pub mod record;
pub mod timestamp;
pub mod utils;
pub mod virlog;

// Re-export main types for convenience
pub use diagnostic::{Diagnostic, Severity};
pub use error::{Result, VirlogError};
pub use field::{extract_field, Anchor, Extracted, FieldDescriptor, FieldKind};
pub use locator::{Indexed, MarkerDelimited, RecordLocator, RecordSpan};
pub use record::{parse_record, FieldValue, Layout, ParsedRecord, RecordParser};
pub use timestamp::{unix_timestamp_to_text, windows_to_unix};
pub use virlog::Virlog;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
