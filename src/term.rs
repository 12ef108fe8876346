// 📅 Term Normalizer
// "F24" → "Fall 2024", "SP 19" → "Spring 2019"

use crate::config::IngestConfig;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

// ============================================================================
// TERM VALUE
// ============================================================================

/// Canonical academic term: season display name + 4-digit year
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    pub season: String,
    pub year: u16,
}

impl Term {
    pub fn new(season: &str, year: u16) -> Self {
        Term {
            season: season.to_string(),
            year,
        }
    }

    /// Parse a raw transcript term token ("F24", "SP 19")
    ///
    /// Returns None when the season letters or the 2-digit year are missing.
    pub fn from_token(token: &str, config: &IngestConfig) -> Option<Self> {
        let cleaned: String = token.chars().filter(|c| !c.is_whitespace()).collect();

        let season_len = cleaned
            .chars()
            .take(2)
            .take_while(|c| c.is_ascii_uppercase())
            .count();
        if season_len == 0 {
            return None;
        }
        let season_code = &cleaned[..season_len];

        let tail: Vec<char> = cleaned.chars().rev().take(2).collect();
        if tail.len() < 2 || !tail.iter().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let year_suffix = (tail[1].to_digit(10)? * 10 + tail[0].to_digit(10)?) as u16;

        let year = config.century_base.checked_add(year_suffix)?;

        let season = config.season_name(season_code).unwrap_or(season_code);
        Some(Term::new(season, year))
    }

    /// Parse a canonical term name ("Fall 2024")
    pub fn from_name(name: &str) -> Option<Self> {
        let (season, year) = name.trim().rsplit_once(' ')?;
        let season = season.trim();
        if season.is_empty() || year.len() != 4 {
            return None;
        }
        let year = year.parse().ok()?;
        Some(Term::new(season, year))
    }

    /// Position within the calendar year (Spring, Summer, Fall, then anything else)
    fn season_rank(&self) -> u8 {
        match self.season.as_str() {
            "Spring" => 0,
            "Summer" => 1,
            "Fall" => 2,
            _ => 3,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season, self.year)
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then_with(|| self.season_rank().cmp(&other.season_rank()))
            .then_with(|| self.season.cmp(&other.season))
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Map a raw term token to its canonical display name
///
/// Total: a token that does not look like season + year comes back unchanged.
pub fn normalize_term(token: &str, config: &IngestConfig) -> String {
    match Term::from_token(token, config) {
        Some(term) => term.to_string(),
        None => {
            debug!(token, "term token not normalized, keeping as-is");
            token.to_string()
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(token: &str) -> String {
        normalize_term(token, &IngestConfig::default())
    }

    #[test]
    fn test_known_seasons() {
        assert_eq!(normalize("F24"), "Fall 2024");
        assert_eq!(normalize("SP19"), "Spring 2019");
        assert_eq!(normalize("SI24"), "Summer 2024");
    }

    #[test]
    fn test_embedded_whitespace() {
        assert_eq!(normalize("SP 19"), "Spring 2019");
        assert_eq!(normalize(" F 2 3 "), "Fall 2023");
    }

    #[test]
    fn test_unknown_season_passthrough() {
        assert_eq!(normalize("W21"), "W 2021");
        assert_eq!(normalize("SU22"), "SU 2022");
    }

    #[test]
    fn test_year_always_2000_based() {
        assert_eq!(normalize("F99"), "Fall 2099");
        assert_eq!(normalize("F00"), "Fall 2000");
    }

    #[test]
    fn test_malformed_token_unchanged() {
        assert_eq!(normalize("24"), "24");
        assert_eq!(normalize("Fall"), "Fall");
        assert_eq!(normalize("F2"), "F2");
        assert_eq!(normalize("sp19"), "sp19");
        assert_eq!(normalize(""), "");
        // Original token is returned, not the whitespace-stripped one
        assert_eq!(normalize("X Y"), "X Y");
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(normalize("F24"), normalize("F24"));
    }

    #[test]
    fn test_custom_season_names() {
        let mut config = IngestConfig::default();
        config.season_names.insert("W".to_string(), "Winter".to_string());

        assert_eq!(normalize_term("W21", &config), "Winter 2021");
    }

    #[test]
    fn test_year_overflow_keeps_token() {
        let config = IngestConfig::from_json(r#"{ "century_base": 65500 }"#).unwrap();

        assert_eq!(normalize_term("F99", &config), "F99");
        assert_eq!(normalize_term("F35", &config), "Fall 65535");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Term::from_name("Fall 2024"), Some(Term::new("Fall", 2024)));
        assert_eq!(Term::from_name("W 2021"), Some(Term::new("W", 2021)));
        assert_eq!(Term::from_name("Fall"), None);
        assert_eq!(Term::from_name("Fall 24"), None);
        assert_eq!(Term::from_name("F24"), None);
    }

    #[test]
    fn test_chronological_order() {
        let mut terms = vec![
            Term::new("Fall", 2024),
            Term::new("Spring", 2024),
            Term::new("Fall", 2023),
            Term::new("Summer", 2024),
        ];
        terms.sort();

        let names: Vec<String> = terms.iter().map(|t| t.to_string()).collect();
        assert_eq!(
            names,
            vec!["Fall 2023", "Spring 2024", "Summer 2024", "Fall 2024"]
        );
    }
}
