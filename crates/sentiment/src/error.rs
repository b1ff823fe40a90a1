//! Sentiment engine errors

use thiserror::Error;

/// Validation and scoring failures for one news item
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("title is empty or missing")]
    MissingTitle,

    #[error("summary is empty or missing")]
    MissingSummary,

    #[error("title and summary are empty or missing")]
    MissingContent,

    #[error("news item is malformed: {0}")]
    MalformedItem(String),

    #[error("internal scoring fault: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Failure reported by an external impact assessor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("assessor {assessor} failed: {message}")]
pub struct AssessorError {
    pub assessor: String,
    pub message: String,
}

impl AssessorError {
    pub fn new(assessor: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            assessor: assessor.into(),
            message: message.into(),
        }
    }
}

/// Invalid lexicon or coin vocabulary data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexiconError {
    #[error("empty phrase in {table} table")]
    EmptyPhrase { table: &'static str },

    #[error("phrase '{phrase}' has invalid weight {weight} (must be finite and > 0)")]
    InvalidWeight { phrase: String, weight: f64 },

    #[error("phrase '{phrase}' appears twice in {table} table")]
    Duplicate { phrase: String, table: &'static str },

    #[error("coin '{symbol}' has no usable alias")]
    EmptyCoin { symbol: String },

    #[error("lexicon parse error: {0}")]
    Parse(String),
}

/// Invalid scoring constants
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("threshold must be finite and > 0, got {0}")]
    Threshold(f64),

    #[error("baseline/ceiling must satisfy 0 <= baseline <= ceiling <= 100, got {baseline}/{ceiling}")]
    Range { baseline: f64, ceiling: f64 },

    #[error("evidence_scale must be finite and > 0, got {0}")]
    EvidenceScale(f64),

    #[error("title_weight must be finite and >= 1, got {0}")]
    TitleWeight(f64),
}
