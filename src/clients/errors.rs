use rspotify::ClientError;
use rspotify::model::IdError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Spotify authentication failed: {0}")]
    Authentication(String),

    #[error("Spotify error: {0}")]
    Spotify(#[from] ClientError),

    #[error("Invalid catalog id: {0}")]
    InvalidId(#[from] IdError),

    #[error("Giving up after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: ClientError,
    },

    #[error("Request timed out after {attempts} attempts")]
    Timeout { attempts: u32 },

    #[error("No recommendations available for this track")]
    RecommendationsUnavailable,

    #[error("Unexpected search response: {0}")]
    UnexpectedResponse(String),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::Configuration(err.to_string())
    }
}
