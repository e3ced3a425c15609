use thiserror::Error;

#[derive(Debug, Error)]
pub enum EquityModelError {
    #[error("Invalid argument: {field} — {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Unknown plan: '{0}' (expected one of base, premium, corporate)")]
    UnknownPlan(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl EquityModelError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        EquityModelError::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for EquityModelError {
    fn from(e: serde_json::Error) -> Self {
        EquityModelError::SerializationError(e.to_string())
    }
}
