//! Rendering parsed records as delimited text or JSON lines.

use crate::record::ParsedRecord;
use std::io::{self, Write};

/// Separator between values on a line.
pub const FIELD_SEPARATOR: &str = ";";

/// Separator between lines.
pub const RECORD_SEPARATOR: &str = "\n";

/// Joins one row of values.
pub fn render_line<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    values.into_iter().collect::<Vec<_>>().join(FIELD_SEPARATOR)
}

/// Renders a header line followed by one line per record.
///
/// Values are written as-is; there is no quoting. The result has no
/// trailing newline.
///
/// ```rust
/// use eset_virlog::output::render_text;
/// use eset_virlog::record::{parse_record, Layout};
///
/// let record = parse_record(Layout::Indexed, 0, &[]);
/// let text = render_text(&Layout::Indexed.header(), &[record]);
/// assert_eq!(text.lines().count(), 2);
/// ```
pub fn render_text(header: &[&str], records: &[ParsedRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(render_line(header.iter().copied()));
    lines.extend(records.iter().map(|record| render_line(record.values())));
    lines.join(RECORD_SEPARATOR)
}

/// Writes [`render_text`] output followed by a final newline.
pub fn write_text<W: Write>(writer: &mut W, header: &[&str], records: &[ParsedRecord]) -> io::Result<()> {
    writer.write_all(render_text(header, records).as_bytes())?;
    writer.write_all(RECORD_SEPARATOR.as_bytes())?;
    writer.flush()
}

/// Writes one JSON object per record, keyed by column name.
#[cfg(feature = "serde")]
pub fn write_json_lines<W: Write>(writer: &mut W, records: &[ParsedRecord]) -> io::Result<()> {
    for record in records {
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(RECORD_SEPARATOR.as_bytes())?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{parse_record, Layout};

    #[test]
    fn test_render_line() {
        assert_eq!(render_line(["a", "", "c"]), "a;;c");
        assert_eq!(render_line(Vec::<&str>::new()), "");
    }

    #[test]
    fn test_render_text_line_count() {
        let layout = Layout::Delimited;
        let records = vec![parse_record(layout, 0, &[]), parse_record(layout, 1, &[])];

        let text = render_text(&layout.header(), &records);
        assert_eq!(text.split('\n').count(), 3);
        assert!(text.starts_with("ID;Timestamp;VirusDB"));
        assert!(text.ends_with("1;;;;;;;;;"));
    }

    #[test]
    fn test_write_text_adds_final_newline() {
        let layout = Layout::Delimited;
        let records = vec![parse_record(layout, 0, &[]), parse_record(layout, 1, &[])];

        let mut out = Vec::new();
        write_text(&mut out, &layout.header(), &records).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches('\n').count(), 3);
    }

    #[test]
    fn test_header_only() {
        assert_eq!(render_text(&["ID", "User"], &[]), "ID;User");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_lines() {
        let records = vec![parse_record(Layout::Indexed, 4, &[])];
        let mut out = Vec::new();
        write_json_lines(&mut out, &records).unwrap();

        let line = String::from_utf8(out).unwrap();
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["ID"], "4");
        assert_eq!(value["FirstSeen"], "");
    }
}
