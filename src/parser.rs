// 🏗️ Record Extractor - Line grammar over extracted transcript text
//
// An APAS report is tabular in the PDF but comes out of text extraction as
// run-together lines such as:
//
//   F24 1CSCI30813.0BExcellent Course
//   SP 191MATH12714.0T5Calculus I
//
// Each record is: term token, course token ("1" + dept + number), credit ("4.0"),
// grade code, then a free-text title to end of line.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::debug;

// ============================================================================
// GRAMMAR
// ============================================================================

/// Fixed record grammar. Alternation order of `grade` matters: longer codes first.
const RECORD_PATTERN: &str = concat!(
    r"(?m)^",
    r"(?P<term>[A-Z]{1,2}\s?[0-9]{2})",
    r"[ \t]*",
    r"(?P<course>1[A-Z]{2,4}[0-9]{3,4}[A-Z]?)",
    r"[ \t]*",
    r"(?P<credit>[0-9]\.[0-9])",
    r"[ \t]*",
    r"(?P<grade>T[0-9]{1,2}|N[0-9]{1,2}|SN?|AF|IP|NG|W|V|[A-Z][+\-]|[A-Z])",
    r"(?P<title>.*)",
);

static RECORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(RECORD_PATTERN).expect("record grammar is a valid regex"));

// ============================================================================
// RAW MATCH
// ============================================================================

/// RawMatch - one grammar match, fields exactly as they appear in the text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawMatch<'t> {
    pub term_token: &'t str,
    pub course_token: &'t str,
    pub credit_token: &'t str,
    pub grade_token: &'t str,
    pub title_token: &'t str,

    // Provenance
    pub line_number: usize,  // 1-based line where the match starts
    pub raw_line: &'t str,   // Whole matched text, for debugging
}

impl<'t> RawMatch<'t> {
    fn from_captures(caps: &Captures<'t>, line_number: usize) -> Self {
        let field = |name: &str| caps.name(name).map(|m| m.as_str()).unwrap_or("");

        RawMatch {
            term_token: field("term"),
            course_token: field("course"),
            credit_token: field("credit"),
            grade_token: field("grade"),
            title_token: field("title"),
            line_number,
            raw_line: caps.get(0).map(|m| m.as_str()).unwrap_or(""),
        }
    }
}

// ============================================================================
// EXTRACTOR
// ============================================================================

/// RecordExtractor - stateless; every call to `extract` starts a fresh scan
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordExtractor;

impl RecordExtractor {
    pub fn new() -> Self {
        RecordExtractor
    }

    /// Lazily scan `text` for records. Empty text or no matches → empty iterator.
    pub fn extract<'t>(&self, text: &'t str) -> RawMatches<'t> {
        RawMatches {
            regex: Lazy::force(&RECORD_REGEX),
            text,
            pos: 0,
            line: 1,
            counted_to: 0,
        }
    }
}

/// Iterator over RawMatch values; cloning it snapshots the scan position
#[derive(Debug, Clone)]
pub struct RawMatches<'t> {
    regex: &'static Regex,
    text: &'t str,
    pos: usize,

    // Line bookkeeping: `line` is the line number at byte offset `counted_to`
    line: usize,
    counted_to: usize,
}

impl<'t> RawMatches<'t> {
    fn line_at(&mut self, offset: usize) -> usize {
        self.line += self.text[self.counted_to..offset]
            .bytes()
            .filter(|&b| b == b'\n')
            .count();
        self.counted_to = offset;
        self.line
    }

    /// Byte length of the char starting at `offset` (1 at end of text)
    fn char_len_at(&self, offset: usize) -> usize {
        self.text[offset..]
            .chars()
            .next()
            .map(|c| c.len_utf8())
            .unwrap_or(1)
    }
}

impl<'t> Iterator for RawMatches<'t> {
    type Item = RawMatch<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos <= self.text.len() {
            let caps = self.regex.captures_at(self.text, self.pos)?;
            let whole = caps.get(0)?;

            // Zero-width match: step one char past it so the scan always advances
            if whole.start() == whole.end() {
                self.pos = whole.end() + self.char_len_at(whole.end());
                continue;
            }

            self.pos = whole.end();
            let line_number = self.line_at(whole.start());
            let raw = RawMatch::from_captures(&caps, line_number);

            debug!(
                line = raw.line_number,
                term = raw.term_token,
                course = raw.course_token,
                grade = raw.grade_token,
                "extracted transcript record"
            );
            return Some(raw);
        }

        None
    }
}

/// Convenience: collect every record in `text`
pub fn extract_records(text: &str) -> Vec<RawMatch<'_>> {
    RecordExtractor::new().extract(text).collect()
}

// ============================================================================
// TESTS
// ============================================================================
