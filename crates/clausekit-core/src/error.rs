use thiserror::Error;

use crate::validate::Rejection;

/// Shown when the service does not explain a failure.
pub const UPLOAD_FAILED: &str = "Upload failed. Please try again.";

/// Shown when submit is pressed with nothing selected.
pub const NO_FILE_SELECTED: &str = "Please select a file first";

/// Failure of a single upload, as the user sees it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The service answered with its own error message.
    #[error("{0}")]
    Service(String),
    #[error("{}", UPLOAD_FAILED)]
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error("an upload is in progress")]
    UploadInFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRefused {
    #[error("{}", NO_FILE_SELECTED)]
    NoFile,
    #[error("an upload is already in progress")]
    InFlight,
}
