use thiserror::Error;

/// Errors produced by the derivation engine
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalcError {
    /// Per-user figures are undefined without at least one user
    #[error("Monthly users must be at least 1")]
    NoUsers,
    /// Gross margin outside [0, 100), or a negative markup
    #[error("Invalid margin: {0}%")]
    InvalidMargin(f64),
    /// Model id not present in the catalog
    #[error("Model not found: {0}")]
    UnknownModel(String),
    /// Context window id not present in the catalog
    #[error("Context window not found: {0}")]
    UnknownContextWindow(String),
    /// Usage preset id not present in the catalog
    #[error("Preset not found: {0}")]
    UnknownPreset(String),
}

/// Errors produced by the lead-capture form
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LeadError {
    /// Rejected before submission; shown inline next to the field
    #[error("Invalid email: {0}")]
    InvalidEmail(String),
    /// Submission itself failed; the form stays usable
    #[error("Submission failed: {0}")]
    Submission(String),
}

impl LeadError {
    /// Short machine-readable name, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidEmail(_) => "invalid_email",
            Self::Submission(_) => "submission_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CalcError::UnknownModel("gpt-5".to_string());
        assert_eq!(error.to_string(), "Model not found: gpt-5");

        let error = CalcError::InvalidMargin(100.0);
        assert_eq!(error.to_string(), "Invalid margin: 100%");
    }

    #[test]
    fn test_lead_error_kind() {
        assert_eq!(LeadError::InvalidEmail("x".to_string()).kind(), "invalid_email");
        assert_eq!(LeadError::Submission("x".to_string()).kind(), "submission_failed");
    }
}
