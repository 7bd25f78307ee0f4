//! Non-fatal anomalies found while scanning records.
//!
//! The log format has no published layout, so missing fields and odd bytes
//! are expected. They are collected as [`Diagnostic`] values alongside the
//! parsed data rather than returned as errors.

use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Expected absence of optional data.
    Info,
    /// Data present but not in the expected shape.
    Warning,
}

impl Severity {
    /// Returns the label used when rendering diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
        }
    }
}

/// A single per-field or per-record anomaly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The field's marker does not occur in the record.
    FieldNotFound {
        /// Field name.
        field: &'static str,
    },

    /// Reserved bytes were non-zero, an embedded ID disagreed with the record
    /// index, or the record ended before the field's fixed-width payload.
    UnexpectedBytes {
        /// Field name.
        field: &'static str,
    },

    /// A wide string contained malformed UTF-16 and was decoded lossily.
    InvalidUtf16 {
        /// Field name.
        field: &'static str,
    },
}

impl Diagnostic {
    /// Returns the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::FieldNotFound { .. } => Severity::Info,
            Diagnostic::UnexpectedBytes { .. } | Diagnostic::InvalidUtf16 { .. } => {
                Severity::Warning
            }
        }
    }

    /// Returns the name of the field this diagnostic refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Diagnostic::FieldNotFound { field }
            | Diagnostic::UnexpectedBytes { field }
            | Diagnostic::InvalidUtf16 { field } => field,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.severity().label();
        match self {
            Diagnostic::FieldNotFound { field } => {
                write!(f, "{}: field not found: {}", label, field)
            }
            Diagnostic::UnexpectedBytes { field } => {
                write!(f, "{}: unexpected bytes in field {}", label, field)
            }
            Diagnostic::InvalidUtf16 { field } => {
                write!(f, "{}: invalid UTF-16 in field {}", label, field)
            }
        }
    }
}
