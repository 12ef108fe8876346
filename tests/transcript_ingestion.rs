// End-to-end: transcript text → classified records → merged profile record

use apas_ingest::{
    extract_records, ingest_transcript, parse_transcript, AcademicRecord, Classification,
    IngestConfig, ManualEdits, ParsedCourse, ProfileReconciler, RecordClassifier,
};

const TRANSCRIPT: &str = "\
UNIVERSITY OF MINNESOTA - ACADEMIC PROGRESS AUDIT
Goldy Gopher                          Computer Science BS
Course History
F23 1CSCI11334.0AIntro to Computer Science I
F23 1MATH12714.0T5Calculus I
SP 24 1CSCI19334.0B+Intro to Computer Science II
SP24 1CSCI20214.0IPMachine Architecture
SI24 1STAT30213.0SProbability and Statistics
F24 1CSCI3081W4.0A-Program Design and Development
F24 1CHEM10613.0N3Chemical Principles I
   --- page 2 ---
F24 1CSCI3081W4.0A-Program Design and Development
";

#[test]
fn test_spec_example_line() {
    let records = extract_records("F24 1CSCI30813.0BExcellent Course");
    assert_eq!(records.len(), 1);

    let classified = RecordClassifier::new().classify(&records[0]);
    assert_eq!(
        classified.course,
        ParsedCourse::new("CSCI 3081", 3.0, "B", "Excellent Course")
    );
    assert_eq!(
        classified.classification,
        Classification::TermCourse("Fall 2024".to_string())
    );
}

#[test]
fn test_parse_full_transcript() {
    let record = parse_transcript(TRANSCRIPT, &IngestConfig::default());

    let term_names: Vec<&str> = record
        .terms_chronological()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(
        term_names,
        vec!["Fall 2023", "Spring 2024", "Summer 2024", "Fall 2024"]
    );

    let spring = record.terms.get("Spring 2024").unwrap();
    assert_eq!(spring.len(), 2);
    assert_eq!(spring[0].course, "CSCI 1933");
    assert_eq!(spring[0].grade, "B+");
    assert_eq!(spring[1].grade, "IP");

    // Repeated page line collapses to one entry
    let fall = record.terms.get("Fall 2024").unwrap();
    assert_eq!(fall.len(), 1);
    assert_eq!(fall[0].course, "CSCI 3081W");
    assert_eq!(fall[0].title, "Program Design and Development");

    // T and N grades go to transfer credit
    let transfer_codes: Vec<&str> = record.transfers.iter().map(|c| c.course.as_str()).collect();
    assert_eq!(transfer_codes, vec!["MATH 1271", "CHEM 1061"]);

    assert_eq!(record.course_count(), 7);
}

#[test]
fn test_reupload_is_idempotent() {
    let config = IngestConfig::default();

    let first = ingest_transcript(TRANSCRIPT, &AcademicRecord::new(), &ManualEdits::new(), &config);
    let second = ingest_transcript(TRANSCRIPT, &first.record, &ManualEdits::new(), &config);

    assert_eq!(first.record, second.record);
    assert!(second.report.is_noop());
    assert_eq!(second.report.duplicates_skipped, second.report.parsed_records);
}

#[test]
fn test_merge_with_existing_profile_and_edits() {
    let existing: AcademicRecord = serde_json::from_str(
        r#"{
            "semesters": {
                "Fall 2022": [ { "course": "WRIT 1301", "grade": "A", "title": "University Writing" } ],
                "Fall 2023": [ { "course": "CSCI 1133", "grade": "A", "credit": 4.0 } ]
            },
            "transferCourses": [ { "course": "PHYS 1301W", "grade": "T4", "credit": 4.0 } ]
        }"#,
    )
    .unwrap();

    // User deleted Fall 2022 and removed the physics transfer on the profile page
    let edits = ManualEdits::new()
        .with_term("Fall 2022", vec![])
        .with_transfers(vec![]);

    let outcome = ProfileReconciler::new().ingest(TRANSCRIPT, &existing, &edits);
    let record = &outcome.record;

    assert!(!record.terms.contains_term("Fall 2022"));
    assert_eq!(outcome.report.pruned_terms, vec!["Fall 2022".to_string()]);

    // CSCI 1133/A was already stored for Fall 2023, so the stored entry wins
    assert_eq!(record.terms.get("Fall 2023").unwrap().len(), 1);
    assert_eq!(record.terms.get("Fall 2023").unwrap()[0].title, "");

    assert_eq!(record.transfers.len(), 2);
    assert!(record.transfers.iter().all(|c| c.course != "PHYS 1301W"));
}

#[test]
fn test_no_empty_terms_in_output() {
    let mut existing = AcademicRecord::new();
    existing.terms.replace("Spring 2021", vec![]);

    let outcome = ProfileReconciler::new().ingest("", &existing, &ManualEdits::new());

    assert!(outcome.record.is_empty());
    let json = serde_json::to_value(&outcome.record).unwrap();
    assert!(json["semesters"].as_object().unwrap().is_empty());
}

#[test]
fn test_pathological_input_terminates() {
    let noise = "@".repeat(10_000);
    assert!(extract_records(&noise).is_empty());
    assert!(parse_transcript(&noise, &IngestConfig::default()).is_empty());
}

#[test]
fn test_retake_survives_merge() {
    let text = "F23 1CSCI19334.0DData Structures\nF23 1CSCI19334.0AData Structures";

    let record = parse_transcript(text, &IngestConfig::default());
    let grades: Vec<&str> = record
        .terms
        .get("Fall 2023")
        .unwrap()
        .iter()
        .map(|c| c.grade.as_str())
        .collect();

    assert_eq!(grades, vec!["D", "A"]);
}
