use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Detector request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("JSON (de)serialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed line {line} ({reason}): `{content}`")]
    MalformedLineError {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("Empty input: {0}")]
    EmptyInputError(String),

    #[error("Missing expected data: {0}")]
    MissingData(String),
}

impl Error {
    pub(crate) fn malformed(line: usize, content: &str, reason: impl Into<String>) -> Self {
        Error::MalformedLineError {
            line,
            content: content.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
