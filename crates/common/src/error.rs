use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),
    #[error("Reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("Invalid response data: {0} status: {1}")]
    InvalidResponseData(String, u16),
    #[error("serde error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl Error {
    /// True when the failure came from talking to the suggestion service
    /// rather than from local setup.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::ReqwestError(_) | Self::InvalidResponseData(..) | Self::SerdeError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
