use thiserror::Error;

#[derive(Error, Debug)]
pub enum LikepulseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Sentiment error: {0}")]
    Sentiment(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
