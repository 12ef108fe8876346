// ⚖️ Profile Reconciler - Merge parsed transcript records into a profile
//
// Merge, per profile-update request:
//   1. existing record, overlaid with the manual edits sent with the request
//   2. term coursework → its term bucket, unless (course, grade) already there
//   3. transfer credit → flat transfer list, same (course, grade) rule
//   4. prune term buckets left empty
//
// Re-uploading the same transcript is expected: duplicates are skipped, never errors.

use crate::classifier::{Classification, ClassifiedCourse, RecordClassifier};
use crate::config::IngestConfig;
use crate::parser::RecordExtractor;
use crate::record::{AcademicRecord, ParsedCourse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

// ============================================================================
// MANUAL EDITS
// ============================================================================

/// Term/transfer state the user edited by hand on the profile page.
///
/// A listed term replaces the stored term wholesale (an empty list deletes it).
/// `transfers`, when present, replaces the stored transfer list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualEdits {
    #[serde(rename = "semesters", default)]
    pub terms: BTreeMap<String, Vec<ParsedCourse>>,

    #[serde(rename = "transferCourses", default)]
    pub transfers: Option<Vec<ParsedCourse>>,
}

impl ManualEdits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.transfers.is_none()
    }

    /// Builder: set a term's full course list
    pub fn with_term(mut self, term: &str, courses: Vec<ParsedCourse>) -> Self {
        self.terms.insert(term.to_string(), courses);
        self
    }

    /// Builder: set the full transfer list
    pub fn with_transfers(mut self, transfers: Vec<ParsedCourse>) -> Self {
        self.transfers = Some(transfers);
        self
    }
}

// ============================================================================
// MERGE REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeReport {
    /// Classified records offered to the merge
    pub parsed_records: usize,
    pub term_courses_added: usize,
    pub transfers_added: usize,
    pub duplicates_skipped: usize,
    pub pruned_terms: Vec<String>,

    /// SHA-256 of the transcript text, when the merge came from a transcript
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_digest: Option<String>,

    pub merged_at: DateTime<Utc>,
}

impl MergeReport {
    pub fn added(&self) -> usize {
        self.term_courses_added + self.transfers_added
    }

    /// Nothing new landed (e.g. the same transcript uploaded twice)
    pub fn is_noop(&self) -> bool {
        self.added() == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "Merged {} records: {} term courses added, {} transfers added, {} duplicates skipped, {} empty terms pruned",
            self.parsed_records,
            self.term_courses_added,
            self.transfers_added,
            self.duplicates_skipped,
            self.pruned_terms.len()
        )
    }
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub record: AcademicRecord,
    pub report: MergeReport,
}

// ============================================================================
// PROFILE RECONCILER
// ============================================================================

pub struct ProfileReconciler {
    extractor: RecordExtractor,
    classifier: RecordClassifier,
}

impl ProfileReconciler {
    pub fn new() -> Self {
        Self::with_config(IngestConfig::default())
    }

    pub fn with_config(config: IngestConfig) -> Self {
        ProfileReconciler {
            extractor: RecordExtractor::new(),
            classifier: RecordClassifier::with_config(config),
        }
    }

    pub fn config(&self) -> &IngestConfig {
        self.classifier.config()
    }

    /// Extract and classify every record in the transcript text
    pub fn classify_transcript(&self, text: &str) -> Vec<ClassifiedCourse> {
        if text.trim().is_empty() {
            debug!("empty transcript text, nothing to parse");
            return Vec::new();
        }

        let classified: Vec<ClassifiedCourse> = self
            .extractor
            .extract(text)
            .map(|raw| self.classifier.classify(&raw))
            .collect();

        if classified.is_empty() {
            warn!(
                text_len = text.len(),
                "no courses extracted from transcript text"
            );
        }
        classified
    }

    /// Transcript text → standalone record (terms + transfers, deduplicated)
    pub fn parse_transcript(&self, text: &str) -> AcademicRecord {
        let classified = self.classify_transcript(text);
        self.merge(&AcademicRecord::new(), &ManualEdits::new(), &classified)
            .record
    }

    /// Merge classified records into an existing record.
    ///
    /// Inputs are untouched; the merged record is returned with a report.
    pub fn merge(
        &self,
        existing: &AcademicRecord,
        edits: &ManualEdits,
        parsed: &[ClassifiedCourse],
    ) -> MergeOutcome {
        let mut record = Self::overlay(existing, edits);

        let mut term_courses_added = 0;
        let mut transfers_added = 0;
        let mut duplicates_skipped = 0;

        for item in parsed {
            let added = match &item.classification {
                Classification::TermCourse(term) => {
                    let added = record.terms.insert(term, item.course.clone());
                    if added {
                        term_courses_added += 1;
                    }
                    added
                }
                Classification::TransferCourse => {
                    let added = record.transfers.insert(item.course.clone());
                    if added {
                        transfers_added += 1;
                    }
                    added
                }
            };

            if !added {
                duplicates_skipped += 1;
                debug!(
                    course = %item.course.course,
                    grade = %item.course.grade,
                    "duplicate record skipped"
                );
            }
        }

        let pruned_terms = record.terms.prune_empty();

        let report = MergeReport {
            parsed_records: parsed.len(),
            term_courses_added,
            transfers_added,
            duplicates_skipped,
            pruned_terms,
            transcript_digest: None,
            merged_at: Utc::now(),
        };

        info!(
            parsed = report.parsed_records,
            term_added = report.term_courses_added,
            transfers_added = report.transfers_added,
            duplicates = report.duplicates_skipped,
            pruned = report.pruned_terms.len(),
            "profile record merged"
        );

        MergeOutcome { record, report }
    }

    /// Full pipeline: transcript text → classified records → merged profile record
    pub fn ingest(
        &self,
        text: &str,
        existing: &AcademicRecord,
        edits: &ManualEdits,
    ) -> MergeOutcome {
        let parsed = self.classify_transcript(text);
        let mut outcome = self.merge(existing, edits, &parsed);
        outcome.report.transcript_digest = Some(transcript_digest(text));
        outcome
    }

    /// Step 1: existing record with manual edits laid over it.
    /// Re-inserting through the bucket/collection enforces the (course, grade) rule.
    fn overlay(existing: &AcademicRecord, edits: &ManualEdits) -> AcademicRecord {
        let mut record = AcademicRecord::new();

        for (term, courses) in existing.terms.iter() {
            if edits.terms.contains_key(term) {
                continue;
            }
            record.terms.replace(term, courses.to_vec());
        }
        for (term, courses) in &edits.terms {
            record.terms.replace(term, courses.clone());
        }

        record.transfers = match &edits.transfers {
            Some(transfers) => transfers.iter().cloned().collect(),
            None => existing.transfers.iter().cloned().collect(),
        };

        record
    }
}

impl Default for ProfileReconciler {
    fn default() -> Self {
        Self::new()
    }
}

/// Hex SHA-256 of transcript text; identical uploads share a digest
pub fn transcript_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// CONVENIENCE
// ============================================================================

/// Parse transcript text into a standalone record
pub fn parse_transcript(text: &str, config: &IngestConfig) -> AcademicRecord {
    ProfileReconciler::with_config(config.clone()).parse_transcript(text)
}

/// Parse transcript text and merge it into an existing profile record
pub fn ingest_transcript(
    text: &str,
    existing: &AcademicRecord,
    edits: &ManualEdits,
    config: &IngestConfig,
) -> MergeOutcome {
    ProfileReconciler::with_config(config.clone()).ingest(text, existing, edits)
}

// ============================================================================
// TESTS
// ============================================================================
