// 🏷️ Record Classifier & Normalizer
// RawMatch → ParsedCourse + TermCourse/TransferCourse tag
//
// Degrade, don't fail: an irregular field falls back to a usable value
// (unsplit course code, 0.0 credit, raw term token) and the record is kept.

use crate::config::IngestConfig;
use crate::parser::RawMatch;
use crate::record::ParsedCourse;
use crate::term::normalize_term;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// CLASSIFICATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// Standard term coursework, keyed by canonical term name
    TermCourse(String),

    /// Transfer / non-standard credit, stored flat without a term
    TransferCourse,
}

impl Classification {
    pub fn is_transfer(&self) -> bool {
        matches!(self, Classification::TransferCourse)
    }

    pub fn term_name(&self) -> Option<&str> {
        match self {
            Classification::TermCourse(name) => Some(name.as_str()),
            Classification::TransferCourse => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedCourse {
    pub course: ParsedCourse,
    pub classification: Classification,
}

// ============================================================================
// FIELD CLEANING
// ============================================================================

/// "1CSCI3081W" → "CSCI 3081W"
///
/// Falls back to the code without its leading "1" when it does not split into
/// department letters and a number.
pub fn clean_course_code(token: &str) -> String {
    let code = token.strip_prefix('1').unwrap_or(token);

    let dept_len = code
        .bytes()
        .take_while(|b| b.is_ascii_uppercase())
        .count();

    let suffix_len = code
        .bytes()
        .rev()
        .take_while(|b| b.is_ascii_uppercase())
        .count();
    let digits_len = code[..code.len() - suffix_len]
        .bytes()
        .rev()
        .take_while(|b| b.is_ascii_digit())
        .count();
    let number_start = code.len() - suffix_len - digits_len;

    if dept_len == 0 || digits_len == 0 || number_start < dept_len {
        debug!(token, "course code did not split, keeping unsplit");
        return code.to_string();
    }

    format!("{} {}", &code[..dept_len], &code[number_start..])
}

/// "4.0" → 4.0; anything unparsable → 0.0
pub fn parse_credit(token: &str) -> f64 {
    match token.trim().parse::<f64>() {
        Ok(credit) if credit.is_finite() => credit,
        _ => {
            debug!(token, "credit not numeric, using 0.0");
            0.0
        }
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

pub struct RecordClassifier {
    config: IngestConfig,
}

impl RecordClassifier {
    pub fn new() -> Self {
        Self::with_config(IngestConfig::default())
    }

    pub fn with_config(config: IngestConfig) -> Self {
        RecordClassifier { config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Normalize one raw match and decide where it belongs.
    ///
    /// Transfer iff the trimmed grade starts with a configured transfer prefix
    /// (T or N by default). The term token is only resolved for term coursework.
    pub fn classify(&self, raw: &RawMatch<'_>) -> ClassifiedCourse {
        let grade = raw.grade_token.trim();

        let course = ParsedCourse {
            course: clean_course_code(raw.course_token.trim()),
            credit: parse_credit(raw.credit_token),
            grade: grade.to_string(),
            title: raw.title_token.trim().to_string(),
        };

        let classification = if self.config.is_transfer_grade(grade) {
            Classification::TransferCourse
        } else {
            Classification::TermCourse(normalize_term(raw.term_token, &self.config))
        };

        debug!(
            course = %course.course,
            grade = %course.grade,
            transfer = classification.is_transfer(),
            "classified transcript record"
        );

        ClassifiedCourse {
            course,
            classification,
        }
    }
}

impl Default for RecordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
