// ⚙️ Ingest Configuration - Rules as Data
// Season names, transfer grade prefixes and the year base used by the pipeline

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

// ============================================================================
// CONFIG DEFINITION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Season code → display name ("F" → "Fall")
    #[serde(default = "default_season_names")]
    pub season_names: BTreeMap<String, String>,

    /// A grade starting with any of these is transfer credit
    #[serde(default = "default_transfer_prefixes")]
    pub transfer_grade_prefixes: Vec<char>,

    /// Added to the 2-digit year suffix
    #[serde(default = "default_century_base")]
    pub century_base: u16,
}

fn default_season_names() -> BTreeMap<String, String> {
    [("F", "Fall"), ("SP", "Spring"), ("SI", "Summer")]
        .into_iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect()
}

// N grades are grouped with transfer credit; unclear whether that is intended.
fn default_transfer_prefixes() -> Vec<char> {
    vec!['T', 'N']
}

fn default_century_base() -> u16 {
    2000
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            season_names: default_season_names(),
            transfer_grade_prefixes: default_transfer_prefixes(),
            century_base: default_century_base(),
        }
    }
}

impl IngestConfig {
    /// Load config from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_json(&content)
    }

    /// Parse config from a JSON string; missing fields take their defaults
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse ingest config JSON")
    }

    /// Display name for a season code, or None for unknown codes
    pub fn season_name(&self, code: &str) -> Option<&str> {
        self.season_names.get(code).map(|s| s.as_str())
    }

    /// Whether a trimmed grade marks transfer / non-standard credit
    pub fn is_transfer_grade(&self, grade: &str) -> bool {
        grade
            .chars()
            .next()
            .map(|first| self.transfer_grade_prefixes.contains(&first))
            .unwrap_or(false)
    }
}

// ============================================================================
// TESTS
// ============================================================================
