use thiserror::Error;

/// Inline message shown when the creation call or the attachment read fails.
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred while creating the ticket";

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to read attachment '{filename}': {source}")]
    Read {
        filename: String,
        #[source]
        source: std::io::Error,
    },
    #[error("data url for attachment '{filename}' has no base64 marker")]
    MissingMarker { filename: String },
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Encoding(#[from] EncodeError),
    #[error("ticket creation call failed: {0:#}")]
    Submission(anyhow::Error),
}
