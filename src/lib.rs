// APAS Ingest - Core Library
// Transcript text → normalized course records → merged profile record

pub mod config;
pub mod term;
pub mod parser;
pub mod classifier;
pub mod record;
pub mod reconciliation;
pub mod export;

// Re-export commonly used types
pub use config::IngestConfig;
pub use term::{normalize_term, Term};
pub use parser::{extract_records, RawMatch, RawMatches, RecordExtractor};
pub use classifier::{
    clean_course_code, parse_credit,
    Classification, ClassifiedCourse, RecordClassifier,
};
pub use record::{
    AcademicRecord, CourseKey, ParsedCourse, TermBucket, TransferCollection,
};
pub use reconciliation::{
    ingest_transcript, parse_transcript, transcript_digest,
    ManualEdits, MergeOutcome, MergeReport, ProfileReconciler,
};
pub use export::{
    export_csv, load_edits, load_record, record_rows, save_record, write_csv, CourseRow,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
