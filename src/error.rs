//error.rs
//! Error types for the stable matching engine

use crate::key::{format_keys, Key};
use thiserror::Error;

/// Result type alias for matching operations
pub type Result<T> = std::result::Result<T, MatchingError>;

/// Main error type for matching operations
#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("Expecting a preference table mapping of lists (offending entry: {entry})")]
    InputShape { entry: String },

    #[error("Preferences table can not be empty{}", describe_entry(.entry))]
    EmptyInput { entry: Option<String> },

    #[error("Preference table must have an even number of keys (found {count})")]
    Cardinality { count: usize },

    #[error("Marriage sides must be the same size (alpha has {alpha}, beta has {beta})")]
    SideSizes { alpha: usize, beta: usize },

    #[error("All keys must be String or Integer of a single kind: entry {entry} contains {value}")]
    TypeConsistency { entry: String, value: String },

    #[error(
        "Entry {key} has invalid preferences. The extra members are: {}. The missing members are: {}{}",
        format_keys(.extra),
        format_keys(.missing),
        describe_duplicates(.duplicated)
    )]
    Symmetry {
        key: Key,
        extra: Vec<Key>,
        missing: Vec<Key>,
        duplicated: Vec<Key>,
    },

    #[error("No stable match found!")]
    NoStableSolution,

    #[error("Preference table used before its preferences were linked")]
    Unlinked,

    #[error("Consistency check failed: {details}")]
    ConsistencyViolation { details: String },

    #[error("Phase exceeded maximum iterations ({max_iterations})")]
    IterationLimit { max_iterations: usize },

    #[error("Resource limit exceeded: {limit_type} - {details}")]
    ResourceLimit { limit_type: String, details: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn describe_entry(entry: &Option<String>) -> String {
    match entry {
        Some(entry) => format!(" (entry {} has no preferences)", entry),
        None => String::new(),
    }
}

fn describe_duplicates(duplicated: &[Key]) -> String {
    if duplicated.is_empty() {
        String::new()
    } else {
        format!(". The duplicated members are: {}", format_keys(duplicated))
    }
}

impl MatchingError {
    pub fn input_shape(entry: impl Into<String>) -> Self {
        Self::InputShape { entry: entry.into() }
    }

    pub fn not_a_mapping() -> Self {
        Self::input_shape("(root)")
    }

    pub fn empty_table() -> Self {
        Self::EmptyInput { entry: None }
    }

    pub fn empty_list(entry: impl Into<String>) -> Self {
        Self::EmptyInput { entry: Some(entry.into()) }
    }

    pub fn cardinality(count: usize) -> Self {
        Self::Cardinality { count }
    }

    pub fn type_consistency(entry: impl Into<String>, value: impl Into<String>) -> Self {
        Self::TypeConsistency {
            entry: entry.into(),
            value: value.into(),
        }
    }

    pub fn consistency_violation(details: impl Into<String>) -> Self {
        Self::ConsistencyViolation { details: details.into() }
    }

    pub fn iteration_limit(max_iterations: usize) -> Self {
        Self::IterationLimit { max_iterations }
    }

    pub fn resource_limit(limit_type: impl Into<String>, details: impl Into<String>) -> Self {
        Self::ResourceLimit {
            limit_type: limit_type.into(),
            details: details.into(),
        }
    }

    /// True for the structural failures reported by the validator, before any
    /// participant has been built.
    pub fn is_invalid_preferences(&self) -> bool {
        matches!(
            self,
            Self::InputShape { .. }
                | Self::EmptyInput { .. }
                | Self::Cardinality { .. }
                | Self::SideSizes { .. }
                | Self::TypeConsistency { .. }
                | Self::Symmetry { .. }
        )
    }
}
