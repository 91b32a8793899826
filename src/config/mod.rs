//! Ini-style config store
//!
//! Parses a settings buffer into ordered sections of ordered key/value pairs:
//! - `[sectionname]` headers, `key = value` lines beneath
//! - lines whose first byte is `;` or `#` are comments and are dropped
//! - tab, carriage-return and NUL bytes are treated as line breaks
//!
//! The document owns one normalized copy of the input; sections and pairs are
//! stored as byte ranges into it and every lookup hands out a borrowed slice.
//! Nothing is copied per lookup and no slice can outlive the document.
//!
//! Duplicate section names and duplicate keys are not deduplicated: exact-name
//! lookup returns the first occurrence in document order.

use std::fs;
use std::ops::Range;
use std::path::Path;

use tracing::warn;

use crate::error::{LogError, Result};

/// A parsed config file
///
/// Owns the comment-stripped, newline-normalized text; `SectionRef` handles
/// borrow from it.
#[derive(Debug)]
pub struct ConfigDocument {
    text: String,
    sections: Vec<Section>,
}

#[derive(Debug)]
struct Section {
    name: Range<usize>,
    body: Range<usize>,
    pairs: Vec<Pair>,
}

#[derive(Debug)]
struct Pair {
    key: Range<usize>,
    value: Range<usize>,
}

impl ConfigDocument {
    /// Read and parse a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read(path).map_err(|e| LogError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_bytes(&raw)
    }

    /// Parse a config buffer
    ///
    /// The input slice is never mutated; normalization and comment stripping
    /// happen while building the document's own copy.
    pub fn from_bytes(raw: &[u8]) -> Result<Self> {
        let text = normalize(raw)?;
        let sections = scan_sections(&text);

        Ok(Self { text, sections })
    }

    /// Number of sections discovered, in document order
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Section at `index`, in document order
    pub fn section_at(&self, index: usize) -> Option<SectionRef<'_>> {
        self.sections.get(index).map(|section| SectionRef {
            doc: self,
            section,
        })
    }

    /// First section with exactly this name, in document order
    pub fn section(&self, name: &str) -> Option<SectionRef<'_>> {
        self.sections
            .iter()
            .find(|section| &self.text[section.name.clone()] == name)
            .map(|section| SectionRef {
                doc: self,
                section,
            })
    }

    /// Iterate over all sections in document order
    pub fn sections(&self) -> impl Iterator<Item = SectionRef<'_>> {
        self.sections.iter().map(|section| SectionRef {
            doc: self,
            section,
        })
    }
}

/// Borrowed view of one section
#[derive(Clone, Copy)]
pub struct SectionRef<'a> {
    doc: &'a ConfigDocument,
    section: &'a Section,
}

impl<'a> SectionRef<'a> {
    /// Section name, the bytes between `[` and `]`
    pub fn name(&self) -> &'a str {
        &self.doc.text[self.section.name.clone()]
    }

    /// Number of key/value pairs, in document order
    pub fn pair_count(&self) -> usize {
        self.section.pairs.len()
    }

    /// Key/value pair at `index`, in document order
    pub fn pair_at(&self, index: usize) -> Option<(&'a str, &'a str)> {
        self.section.pairs.get(index).map(|pair| {
            (
                &self.doc.text[pair.key.clone()],
                &self.doc.text[pair.value.clone()],
            )
        })
    }

    /// Value of the first pair with exactly this key, in document order
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.section
            .pairs
            .iter()
            .find(|pair| &self.doc.text[pair.key.clone()] == key)
            .map(|pair| &self.doc.text[pair.value.clone()])
    }
}

/// Build the owned text: delimiter bytes become newlines, comment lines are
/// dropped, every kept line ends with a newline.
fn normalize(raw: &[u8]) -> Result<String> {
    let mut clean = Vec::with_capacity(raw.len() + 1);

    let delimited: Vec<u8> = raw
        .iter()
        .map(|&b| match b {
            b'\t' | b'\r' | b'\0' => b'\n',
            other => other,
        })
        .collect();

    for line in delimited.split(|&b| b == b'\n') {
        if matches!(line.first(), Some(b';') | Some(b'#')) {
            continue;
        }
        if line.is_empty() {
            continue;
        }
        clean.extend_from_slice(line);
        clean.push(b'\n');
    }

    String::from_utf8(clean).map_err(|e| LogError::ConfigParse {
        reason: format!("config is not valid UTF-8: {}", e),
    })
}

/// Discover sections: a header is a line starting with `[` that contains a
/// matching `]`. The body runs from just after `]` to the start of the next
/// header line, or the end of the buffer.
fn scan_sections(text: &str) -> Vec<Section> {
    let bytes = text.as_bytes();

    // Line starts of every header-shaped line, with the matched bracket
    // position when the header is well formed.
    let mut headers: Vec<(usize, Option<Range<usize>>)> = Vec::new();
    let mut line_start = 0;

    while line_start < bytes.len() {
        let line_end = bytes[line_start..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|i| line_start + i)
            .unwrap_or(bytes.len());

        if bytes[line_start] == b'[' {
            let name = bytes[line_start..line_end]
                .iter()
                .position(|&b| b == b']')
                .map(|i| line_start + 1..line_start + i);

            if name.is_none() {
                warn!(
                    "section header without closing bracket, skipping: {:?}",
                    &text[line_start..line_end]
                );
            }
            headers.push((line_start, name));
        }

        line_start = line_end + 1;
    }

    let matched = headers.iter().filter(|(_, name)| name.is_some()).count();
    let mut sections = Vec::with_capacity(matched);

    for (i, (_, name)) in headers.iter().enumerate() {
        let Some(name) = name.clone() else { continue };

        let body_start = name.end + 1; // just past ']'
        let body_end = headers
            .get(i + 1)
            .map(|&(next_start, _)| next_start)
            .unwrap_or(bytes.len());
        let body = body_start..body_end.max(body_start);

        let pairs = scan_pairs(text, body.clone());
        sections.push(Section { name, body, pairs });
    }

    sections
}

/// Extract key/value pairs from a section body, line by line. A line yields a
/// pair when it contains `=`: key left of the first `=`, value right of it,
/// both trimmed of surrounding spaces. Lines without `=` are ignored.
fn scan_pairs(text: &str, body: Range<usize>) -> Vec<Pair> {
    let bytes = text.as_bytes();

    // '=' occurrences bound the pair count; size the table up front.
    let bound = bytes[body.clone()].iter().filter(|&&b| b == b'=').count();
    let mut pairs = Vec::with_capacity(bound);

    let mut line_start = body.start;

    while line_start < body.end {
        let line_end = bytes[line_start..body.end]
            .iter()
            .position(|&b| b == b'\n')
            .map(|i| line_start + i)
            .unwrap_or(body.end);

        if let Some(eq) = bytes[line_start..line_end]
            .iter()
            .position(|&b| b == b'=')
            .map(|i| line_start + i)
        {
            let key = trim_spaces(bytes, line_start..eq);
            let value = trim_spaces(bytes, eq + 1..line_end);
            pairs.push(Pair { key, value });
        }

        line_start = line_end + 1;
    }

    pairs
}

/// Shrink a range until it carries no leading or trailing ASCII spaces
fn trim_spaces(bytes: &[u8], mut range: Range<usize>) -> Range<usize> {
    while range.start < range.end && bytes[range.start] == b' ' {
        range.start += 1;
    }
    while range.end > range.start && bytes[range.end - 1] == b' ' {
        range.end -= 1;
    }
    range
}

// ============================================================================
// Tests
// ============================================================================
