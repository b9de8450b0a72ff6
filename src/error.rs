use thiserror::Error;

/// Errors raised by the feature pipeline. Every variant is fatal: the
/// pipeline aborts without returning a partial table, and re-running on the
/// same input reproduces the same error.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Malformed input the temporal ordering or labels cannot be trusted
    /// with (unparseable date, outcome inconsistent with the score).
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// Window configuration outside the allowed range.
    #[error("invalid feature config: {message}")]
    Config { message: String },

    /// Ambiguous team-appearance mapping: a (team, date, season, side) key
    /// resolves to more than one match.
    #[error("integrity violation: {message}")]
    Integrity { message: String },
}

impl FeatureError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }
}
