use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DepictsError>;

#[derive(Debug, Error)]
pub enum DepictsError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not decode response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),

    #[error("received response status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("received error from api ({code}): {info}")]
    Api { code: String, info: String },

    #[error("entity {0} was not returned by the api")]
    EntityNotFound(String),
}
