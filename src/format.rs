//! Bounded-length message formatting
//!
//! Renders one pipe-delimited line per record:
//! `timestamp|filename|linenumber|functionname|label|message`
//!
//! Every field is truncated to its own column width before assembly and the
//! whole line never exceeds [`MAX_LINE_LEN`]. Trailing spaces are stripped and
//! the output carries no interior NUL bytes, so a line's true length is
//! whatever the fields needed.

use std::borrow::Cow;

use tracing::error;

use crate::constants::{
    FIELD_SEPARATOR, FILENAME_WIDTH, FUNCTION_WIDTH, LINENUMBER_WIDTH, MAX_LINE_LEN,
    MESSAGE_WIDTH, SEVERITY_PLACEHOLDER, SEVERITY_WIDTH, TIMESTAMP_WIDTH,
};
use crate::level::SeverityMask;

/// One log record, alive for the duration of a single print call
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    pub severity: SeverityMask,
    pub file: &'a str,
    pub line: u32,
    pub function: &'a str,
    pub message: &'a str,
}

/// Strip everything up to and including the last path separator
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Display label for a severity mask
///
/// A mask that is not exactly one known flag maps to the placeholder and is
/// reported on the internal diagnostic channel.
pub fn severity_label(level: SeverityMask) -> &'static str {
    match level.single() {
        Some(severity) => severity.label(),
        None => {
            error!("unrecognized severity mask: {:#x}", level.bits());
            SEVERITY_PLACEHOLDER
        }
    }
}

/// Local wall-clock time as `HH:MM:SS DD/MM/YY`
pub fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S %d/%m/%y").to_string()
}

/// Assemble the formatted line for a record
pub fn format_line(record: &LogRecord<'_>) -> String {
    let time = timestamp();
    let line_number = record.line.to_string();

    // NULs in the caller's message would split the line; rewrite them to
    // spaces so the output is one contiguous run of printable bytes.
    let message: Cow<'_, str> = if record.message.contains('\0') {
        Cow::Owned(record.message.replace('\0', " "))
    } else {
        Cow::Borrowed(record.message)
    };

    let mut out = String::with_capacity(MAX_LINE_LEN);
    out.push_str(truncate_to(&time, TIMESTAMP_WIDTH));
    out.push(FIELD_SEPARATOR);
    out.push_str(truncate_to(basename(record.file), FILENAME_WIDTH));
    out.push(FIELD_SEPARATOR);
    out.push_str(truncate_to(&line_number, LINENUMBER_WIDTH));
    out.push(FIELD_SEPARATOR);
    out.push_str(truncate_to(record.function, FUNCTION_WIDTH));
    out.push(FIELD_SEPARATOR);
    out.push_str(truncate_to(severity_label(record.severity), SEVERITY_WIDTH));
    out.push(FIELD_SEPARATOR);
    out.push_str(truncate_to(&message, MESSAGE_WIDTH));

    let capped = truncate_to(&out, MAX_LINE_LEN).len();
    out.truncate(capped);

    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);

    out
}

/// Longest prefix of `s` that fits in `max` bytes, cut at a char boundary
fn truncate_to(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }

    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Tests
// ============================================================================
