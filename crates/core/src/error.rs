#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("file storage error: {0}")]
    Files(#[from] plates_files::FilesError),
}

impl CoreError {
    /// Returns true when the caller's input was rejected, as opposed to a server-side failure.
    pub fn is_client_error(&self) -> bool {
        match self {
            CoreError::InvalidInput(_) => true,
            CoreError::Files(e) => e.is_client_error(),
        }
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
