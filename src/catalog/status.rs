//! Processing status of a catalog image and its transition table

use std::fmt;

/// Prefix of error statuses in the catalog column
const ERROR_PREFIX: &str = "error: ";

/// Processing status of one catalog image
///
/// `ingested -> inprogress -> {extracted | final | error(reason)}`.
/// `inprogress` is only entered through a claim. `extracted` may be reset to
/// `ingested` for another extraction pass or promoted to `final`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageStatus {
    Ingested,
    InProgress,
    Extracted,
    Final,
    /// Terminal failure with a short diagnostic
    Error(String),
}

impl ImageStatus {
    /// Shorthand for an error status
    pub fn error<S: Into<String>>(reason: S) -> Self {
        ImageStatus::Error(reason.into())
    }

    /// Value stored in the catalog `status` column
    pub fn as_db(&self) -> String {
        match self {
            ImageStatus::Ingested => "ingested".to_string(),
            ImageStatus::InProgress => "inprogress".to_string(),
            ImageStatus::Extracted => "extracted".to_string(),
            ImageStatus::Final => "final".to_string(),
            ImageStatus::Error(reason) => format!("{}{}", ERROR_PREFIX, reason),
        }
    }

    /// Parse a catalog `status` value
    ///
    /// Unknown values are free-form diagnostics written by older workers and
    /// are read back as errors.
    pub fn from_db(value: &str) -> Self {
        match value {
            "ingested" => ImageStatus::Ingested,
            "inprogress" => ImageStatus::InProgress,
            "extracted" => ImageStatus::Extracted,
            "final" => ImageStatus::Final,
            other => ImageStatus::Error(other.strip_prefix(ERROR_PREFIX).unwrap_or(other).to_string()),
        }
    }

    /// True when no further transition is allowed
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImageStatus::Final | ImageStatus::Error(_))
    }

    /// Transition table
    pub fn can_transition_to(&self, next: &ImageStatus) -> bool {
        use ImageStatus::*;
        match (self, next) {
            (Ingested, InProgress) => true,
            (InProgress, Extracted) | (InProgress, Final) | (InProgress, Error(_)) => true,
            (Extracted, Final) | (Extracted, Ingested) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db())
    }
}
