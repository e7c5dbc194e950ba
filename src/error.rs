use reqwest::StatusCode;
use thiserror::Error;

/// Input errors raised before any request is sent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("bad experiment name: {0:?}")]
    InvalidExperimentName(String),

    #[error("must specify at least 2 alternatives, got {0}")]
    TooFewAlternatives(usize),

    #[error("bad alternative name: {0:?}")]
    InvalidAlternativeName(String),

    #[error("bad KPI name: {0:?}")]
    InvalidKpiName(String),

    #[error("bad traffic_fraction specified (should be a number between 0 and 1): {0}")]
    InvalidTrafficFraction(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between sending a request and holding a
/// decoded body. Never leaves the pipeline: each kind maps to a failed
/// `SixpackResponse`.
#[derive(Error, Debug)]
pub(crate) enum FetchError {
    #[error("failed to send request: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("failed to build http client: {0}")]
    Transport(String),

    #[error("sixpack error: {status}")]
    Status { status: StatusCode, body: String },

    #[error("error parsing sixpack response: {source}")]
    Decode {
        source: serde_json::Error,
        body: String,
    },
}
