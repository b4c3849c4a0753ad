use console_prompt::PromptError;
use platform_client::{CaptureError, PlatformError};
use session_store::SessionStoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Fatal failure of the interactive client.
///
/// Platform rejections are not represented here: the flows report those on
/// the spot and carry on. Only local-machine trouble ends the process — the
/// prompt stream, the session file, or a capture hook that could not persist
/// freshly issued credentials.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] SessionStoreError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session capture failed: {0}")]
    Capture(CaptureError),

    #[error("{0}")]
    Config(String),
}

/// Splits a platform failure into its recoverable and fatal halves.
///
/// A capture failure means the session file could not be written while the
/// platform holds credentials the store does not; that is fatal. Every other
/// platform failure comes back `Ok` for the caller to report in place.
pub fn recoverable(error: PlatformError) -> Result<PlatformError> {
    match error {
        PlatformError::Capture(source) => Err(AppError::Capture(source)),
        other => Ok(other),
    }
}
