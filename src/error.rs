use thiserror::Error;

pub type ScatterResult<T> = Result<T, ScatterError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScatterError {
    #[error("parse error on row {row}, column {column}: {reason}")]
    Parse {
        row: u64,
        column: u64,
        reason: String,
    },

    #[error("could not fetch {resource}: {cause}")]
    Fetch { resource: String, cause: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The request generation changed while the fetch was in flight.
    #[error("fetch superseded by request generation {epoch}")]
    Superseded { epoch: u64 },
}

impl ScatterError {
    #[must_use]
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }

    /// Parse and fetch failures can be retried by re-running the load.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Parse { .. })
    }
}
