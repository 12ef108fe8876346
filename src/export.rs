// 💾 Record I/O - JSON profile records in, JSON/CSV out
// Storage itself belongs to the caller; these helpers only move files.

use crate::reconciliation::ManualEdits;
use crate::record::AcademicRecord;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Load a profile record from JSON. Extra profile fields (name, majors, ...) are ignored.
pub fn load_record(path: &Path) -> Result<AcademicRecord> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse profile JSON: {}", path.display()))
}

pub fn load_edits(path: &Path) -> Result<ManualEdits> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read edits file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse edits JSON: {}", path.display()))
}

pub fn save_record(path: &Path, record: &AcademicRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(record).context("Failed to serialize record")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

// ============================================================================
// CSV EXPORT
// ============================================================================

/// One flat CSV row per course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRow {
    pub kind: String, // "term" or "transfer"
    pub term: String, // empty for transfer credit
    pub course: String,
    pub credit: f64,
    pub grade: String,
    pub title: String,
}

/// Term courses in calendar order, then transfer credit
pub fn record_rows(record: &AcademicRecord) -> Vec<CourseRow> {
    let mut rows = Vec::with_capacity(record.course_count());

    for (term, courses) in record.terms_chronological() {
        for c in courses {
            rows.push(CourseRow {
                kind: "term".to_string(),
                term: term.to_string(),
                course: c.course.clone(),
                credit: c.credit,
                grade: c.grade.clone(),
                title: c.title.clone(),
            });
        }
    }

    for c in record.transfers.iter() {
        rows.push(CourseRow {
            kind: "transfer".to_string(),
            term: String::new(),
            course: c.course.clone(),
            credit: c.credit,
            grade: c.grade.clone(),
            title: c.title.clone(),
        });
    }

    rows
}

pub fn write_csv<W: Write>(writer: W, record: &AcademicRecord) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    let rows = record_rows(record);

    for row in &rows {
        wtr.serialize(row).context("Failed to write CSV row")?;
    }
    wtr.flush().context("Failed to flush CSV output")?;

    Ok(rows.len())
}

pub fn export_csv(path: &Path, record: &AcademicRecord) -> Result<usize> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    write_csv(file, record)
}

// ============================================================================
// TESTS
// ============================================================================
