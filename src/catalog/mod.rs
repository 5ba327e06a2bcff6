pub mod loader;

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use loader::{CatalogLoadError, DEFAULT_CATALOG_PATHS, load_catalog};

/// `number` is any JSON number; only its order matters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    pub name: String,
    pub number: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub number: f64,
    #[serde(default)]
    pub problems: Vec<Problem>,
}

impl Pattern {
    pub fn problem(&self, problem_id: &str) -> Option<&Problem> {
        self.problems.iter().find(|p| p.id == problem_id)
    }

    pub fn problem_index(&self, problem_id: &str) -> Option<usize> {
        self.problems.iter().position(|p| p.id == problem_id)
    }
}

/// A (pattern, problem) pair: the identity of a problem within the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub pattern_id: String,
    pub problem_id: String,
}

impl Position {
    pub fn new(pattern_id: &str, problem_id: &str) -> Self {
        Self {
            pattern_id: pattern_id.to_string(),
            problem_id: problem_id.to_string(),
        }
    }

    /// Key under which the completion flag of this problem is stored.
    pub fn completion_key(&self) -> String {
        completion_key(&self.pattern_id, &self.problem_id)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.pattern_id, self.problem_id)
    }
}

pub fn completion_key(pattern_id: &str, problem_id: &str) -> String {
    format!("{pattern_id}-{problem_id}")
}

#[derive(Debug, Error)]
pub enum CatalogParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON object of patterns")]
    NotAnObject,
    #[error("catalog contains no patterns")]
    Empty,
    #[error("duplicate pattern id '{0}'")]
    DuplicatePattern(String),
    #[error("duplicate problem id '{problem}' in pattern '{pattern}'")]
    DuplicateProblem { pattern: String, problem: String },
}

/// All patterns and their problems, in display order.
///
/// Patterns are sorted by `number`, problems by `number` within their
/// pattern; equal numbers keep id order. There is no mutating API: once
/// parsed, the catalog does not change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    patterns: Vec<Pattern>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the manifest: a JSON object keyed by pattern id.
    pub fn from_json(text: &str) -> Result<Self, CatalogParseError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let object = value.as_object().ok_or(CatalogParseError::NotAnObject)?;
        if object.is_empty() {
            return Err(CatalogParseError::Empty);
        }
        let keyed: BTreeMap<String, Pattern> = serde_json::from_value(value)?;
        Self::from_patterns(keyed.into_iter().map(|(key, mut pattern)| {
            if pattern.id.is_empty() {
                pattern.id = key;
            }
            pattern
        }))
    }

    pub fn from_patterns(
        patterns: impl IntoIterator<Item = Pattern>,
    ) -> Result<Self, CatalogParseError> {
        let mut patterns: Vec<Pattern> = patterns.into_iter().collect();
        let mut seen = HashSet::new();
        for pattern in &mut patterns {
            if !seen.insert(pattern.id.clone()) {
                return Err(CatalogParseError::DuplicatePattern(pattern.id.clone()));
            }
            let mut problem_ids = HashSet::new();
            for problem in &pattern.problems {
                if !problem_ids.insert(problem.id.as_str()) {
                    return Err(CatalogParseError::DuplicateProblem {
                        pattern: pattern.id.clone(),
                        problem: problem.id.clone(),
                    });
                }
            }
            pattern
                .problems
                .sort_by(|a, b| a.number.total_cmp(&b.number).then_with(|| a.id.cmp(&b.id)));
        }
        patterns.sort_by(|a, b| a.number.total_cmp(&b.number).then_with(|| a.id.cmp(&b.id)));
        Ok(Self { patterns })
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn pattern(&self, pattern_id: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.id == pattern_id)
    }

    pub fn pattern_index(&self, pattern_id: &str) -> Option<usize> {
        self.patterns.iter().position(|p| p.id == pattern_id)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn problem_count(&self) -> usize {
        self.patterns.iter().map(|p| p.problems.len()).sum()
    }

    pub fn contains(&self, position: &Position) -> bool {
        self.pattern(&position.pattern_id)
            .is_some_and(|p| p.problem(&position.problem_id).is_some())
    }

    /// Every problem in catalog order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.patterns.iter().flat_map(|pattern| {
            pattern
                .problems
                .iter()
                .map(move |problem| Position::new(&pattern.id, &problem.id))
        })
    }

    pub fn first_position(&self) -> Option<Position> {
        self.positions().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "sliding-window": {
            "id": "sliding-window",
            "name": "Sliding Window",
            "number": 2,
            "problems": [
                {"id": "max-sum", "name": "Maximum Sum Subarray", "number": 2},
                {"id": "avg", "name": "Averages of Subarrays", "number": 1}
            ]
        },
        "two-pointers": {
            "id": "two-pointers",
            "name": "Two Pointers",
            "number": 1,
            "problems": [
                {"id": "pair-sum", "name": "Pair with Target Sum", "number": 1}
            ]
        }
    }"#;

    #[test]
    fn test_patterns_and_problems_sorted_by_number() {
        let catalog = Catalog::from_json(MANIFEST).unwrap();
        let ids: Vec<&str> = catalog.patterns().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["two-pointers", "sliding-window"]);

        let window = catalog.pattern("sliding-window").unwrap();
        let problem_ids: Vec<&str> = window.problems.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(problem_ids, vec!["avg", "max-sum"]);
    }

    #[test]
    fn test_positions_follow_catalog_order() {
        let catalog = Catalog::from_json(MANIFEST).unwrap();
        let positions: Vec<String> = catalog.positions().map(|p| p.to_string()).collect();
        assert_eq!(
            positions,
            vec![
                "two-pointers/pair-sum",
                "sliding-window/avg",
                "sliding-window/max-sum"
            ]
        );
        assert_eq!(catalog.problem_count(), 3);
    }

    #[test]
    fn test_missing_id_falls_back_to_key() {
        let catalog =
            Catalog::from_json(r#"{"dfs": {"name": "DFS", "number": 1, "problems": []}}"#)
                .unwrap();
        assert_eq!(catalog.patterns()[0].id, "dfs");
    }

    #[test]
    fn test_rejects_non_object_and_empty() {
        assert!(matches!(
            Catalog::from_json("[1, 2]"),
            Err(CatalogParseError::NotAnObject)
        ));
        assert!(matches!(
            Catalog::from_json("{}"),
            Err(CatalogParseError::Empty)
        ));
        assert!(matches!(
            Catalog::from_json("{not json"),
            Err(CatalogParseError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_problem_ids() {
        let json = r#"{"p": {"id": "p", "name": "P", "number": 1, "problems": [
            {"id": "a", "name": "A", "number": 1},
            {"id": "a", "name": "A again", "number": 2}
        ]}}"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogParseError::DuplicateProblem { .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_pattern_ids_across_keys() {
        let json = r#"{
            "a": {"id": "same", "name": "A", "number": 1},
            "b": {"id": "same", "name": "B", "number": 2}
        }"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogParseError::DuplicatePattern(id)) if id == "same"
        ));
    }

    #[test]
    fn test_accepts_fractional_and_negative_numbers() {
        let json = r#"{
            "late": {"id": "late", "name": "Late", "number": 2.5,
                     "problems": [{"id": "y", "name": "Y", "number": 1},
                                  {"id": "x", "name": "X", "number": -3}]},
            "early": {"id": "early", "name": "Early", "number": -1}
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        let ids: Vec<&str> = catalog.patterns().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
        let late = catalog.pattern("late").unwrap();
        let problem_ids: Vec<&str> = late.problems.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(problem_ids, vec!["x", "y"]);
    }

    #[test]
    fn test_completion_key_format() {
        assert_eq!(
            Position::new("two-pointers", "pair-sum").completion_key(),
            "two-pointers-pair-sum"
        );
    }
}
