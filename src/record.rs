// 🎓 Academic Record - Profile-level coursework model
// Terms mapping (term name → courses) + flat transfer credit list
//
// Wire shape matches what the profile store already holds:
//   { "semesters": { "Fall 2024": [ {course, credit, grade, title} ] },
//     "transferCourses": [ ... ] }

use crate::term::Term;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// PARSED COURSE
// ============================================================================

/// One completed (or transferred) course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCourse {
    /// Canonical "DEPT NUMBER[SUFFIX]" code, e.g. "CSCI 3081W"
    pub course: String,

    /// Manual entries from the profile page carry no credit
    #[serde(default)]
    pub credit: f64,

    pub grade: String,

    #[serde(default)]
    pub title: String,
}

impl ParsedCourse {
    pub fn new(course: &str, credit: f64, grade: &str, title: &str) -> Self {
        ParsedCourse {
            course: course.to_string(),
            credit,
            grade: grade.to_string(),
            title: title.to_string(),
        }
    }

    /// Dedup key: (course, grade). A retake with a different grade is a distinct record.
    pub fn key(&self) -> CourseKey {
        CourseKey {
            course: self.course.clone(),
            grade: self.grade.clone(),
        }
    }

    pub fn same_record(&self, other: &ParsedCourse) -> bool {
        self.course == other.course && self.grade == other.grade
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseKey {
    pub course: String,
    pub grade: String,
}

// ============================================================================
// TERM BUCKET
// ============================================================================

/// Canonical term name → courses taken that term (insertion order kept)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermBucket(BTreeMap<String, Vec<ParsedCourse>>);

impl TermBucket {
    pub fn new() -> Self {
        TermBucket(BTreeMap::new())
    }

    /// Add a course to a term, creating the term if needed.
    /// Returns false when the same (course, grade) is already in that term.
    pub fn insert(&mut self, term: &str, course: ParsedCourse) -> bool {
        let courses = self.0.entry(term.to_string()).or_default();
        if courses.iter().any(|c| c.same_record(&course)) {
            return false;
        }
        courses.push(course);
        true
    }

    /// Replace a term's courses wholesale (duplicates inside `courses` are dropped)
    pub fn replace(&mut self, term: &str, courses: Vec<ParsedCourse>) {
        self.0.insert(term.to_string(), Vec::new());
        for course in courses {
            self.insert(term, course);
        }
    }

    /// Drop terms with no courses; returns the names removed
    pub fn prune_empty(&mut self) -> Vec<String> {
        let empty: Vec<String> = self
            .0
            .iter()
            .filter(|(_, courses)| courses.is_empty())
            .map(|(name, _)| name.clone())
            .collect();

        for name in &empty {
            self.0.remove(name);
        }
        empty
    }

    pub fn get(&self, term: &str) -> Option<&[ParsedCourse]> {
        self.0.get(term).map(|c| c.as_slice())
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.0.contains_key(term)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ParsedCourse])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn course_count(&self) -> usize {
        self.0.values().map(|c| c.len()).sum()
    }
}

// ============================================================================
// TRANSFER COLLECTION
// ============================================================================

/// Flat transfer / non-standard credit, unique by (course, grade)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferCollection(Vec<ParsedCourse>);

impl TransferCollection {
    pub fn new() -> Self {
        TransferCollection(Vec::new())
    }

    /// Returns false when the same (course, grade) is already present
    pub fn insert(&mut self, course: ParsedCourse) -> bool {
        if self.0.iter().any(|c| c.same_record(&course)) {
            return false;
        }
        self.0.push(course);
        true
    }

    pub fn contains(&self, key: &CourseKey) -> bool {
        self.0
            .iter()
            .any(|c| c.course == key.course && c.grade == key.grade)
    }

    /// Remove every entry with this course code (the profile page removes by code)
    pub fn remove_course(&mut self, course: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|c| c.course != course);
        before - self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParsedCourse> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ParsedCourse> for TransferCollection {
    fn from_iter<I: IntoIterator<Item = ParsedCourse>>(iter: I) -> Self {
        let mut collection = TransferCollection::new();
        for course in iter {
            collection.insert(course);
        }
        collection
    }
}

// ============================================================================
// ACADEMIC RECORD
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcademicRecord {
    #[serde(rename = "semesters", default)]
    pub terms: TermBucket,

    #[serde(rename = "transferCourses", default)]
    pub transfers: TransferCollection,
}

impl AcademicRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.transfers.is_empty()
    }

    /// Term courses + transfer courses
    pub fn course_count(&self) -> usize {
        self.terms.course_count() + self.transfers.len()
    }

    pub fn total_credits(&self) -> f64 {
        let term_credits: f64 = self
            .terms
            .iter()
            .flat_map(|(_, courses)| courses.iter())
            .map(|c| c.credit)
            .sum();
        let transfer_credits: f64 = self.transfers.iter().map(|c| c.credit).sum();

        term_credits + transfer_credits
    }

    pub fn term_credits(&self, term: &str) -> f64 {
        self.terms
            .get(term)
            .map(|courses| courses.iter().map(|c| c.credit).sum())
            .unwrap_or(0.0)
    }

    /// Terms in calendar order; names that are not "<Season> <YYYY>" sort last by name
    pub fn terms_chronological(&self) -> Vec<(&str, &[ParsedCourse])> {
        let mut terms: Vec<(Option<Term>, &str, &[ParsedCourse])> = self
            .terms
            .iter()
            .map(|(name, courses)| (Term::from_name(name), name, courses))
            .collect();

        terms.sort_by(|a, b| match (&a.0, &b.0) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.1.cmp(b.1),
        });

        terms
            .into_iter()
            .map(|(_, name, courses)| (name, courses))
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
