/// Per-product outcome definitions
///
/// This module defines what happened to every product endpoint during the
/// product detail stage, so failures are recorded instead of silently dropped.
use crate::HarvestError;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Reason a product endpoint produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Connection, timeout, or body decoding failure
    Network,

    /// The server answered with a non-success status
    HttpStatus,

    /// The page has no structured data block
    MissingStructuredData,

    /// The structured data block is not valid JSON
    MalformedStructuredData,

    /// The endpoint could not be resolved against the origin
    InvalidEndpoint,
}

impl FailureKind {
    /// Classifies a stage error
    pub fn from_error(error: &HarvestError) -> Self {
        match error {
            HarvestError::Status { .. } => Self::HttpStatus,
            HarvestError::MissingStructuredData { .. } => Self::MissingStructuredData,
            HarvestError::MalformedStructuredData { .. } => Self::MalformedStructuredData,
            HarvestError::InvalidEndpoint { .. } | HarvestError::UrlParse(_) => {
                Self::InvalidEndpoint
            }
            _ => Self::Network,
        }
    }

    /// Converts the failure kind to its report string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::HttpStatus => "http_status",
            Self::MissingStructuredData => "missing_structured_data",
            Self::MalformedStructuredData => "malformed_structured_data",
            Self::InvalidEndpoint => "invalid_endpoint",
        }
    }

    /// Returns all failure kinds
    pub fn all_kinds() -> [Self; 5] {
        [
            Self::Network,
            Self::HttpStatus,
            Self::MissingStructuredData,
            Self::MalformedStructuredData,
            Self::InvalidEndpoint,
        ]
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of fetching one product endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum ProductOutcome {
    /// The structured record was extracted and parsed
    Harvested { endpoint: String, record: Value },

    /// The endpoint yielded no record
    Failed {
        endpoint: String,
        kind: FailureKind,
        message: String,
    },
}

impl ProductOutcome {
    /// Builds a failed outcome from a stage error
    pub fn failed(endpoint: impl Into<String>, error: &HarvestError) -> Self {
        Self::Failed {
            endpoint: endpoint.into(),
            kind: FailureKind::from_error(error),
            message: error.to_string(),
        }
    }

    /// The endpoint this outcome belongs to
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Harvested { endpoint, .. } | Self::Failed { endpoint, .. } => endpoint,
        }
    }

    /// Returns true if a record was harvested
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Harvested { .. })
    }

    /// The harvested record, if any
    pub fn record(&self) -> Option<&Value> {
        match self {
            Self::Harvested { record, .. } => Some(record),
            Self::Failed { .. } => None,
        }
    }

    /// The failure kind, if the endpoint failed
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Harvested { .. } => None,
            Self::Failed { kind, .. } => Some(*kind),
        }
    }
}
