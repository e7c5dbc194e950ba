use reqwest::{Client, StatusCode};
use std::{sync::LazyLock, time::Duration};
use tracing::{event, Level};

use crate::{
    error::FetchError,
    models::{SessionOptions, SessionParams, SixpackResponse},
};

pub const DEFAULT_HOST: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10);

/// Diagnostic returned for every transport level failure.
pub const UNREACHABLE: &str = "http error: sixpack is unreachable";

/// Ordered query parameters. Keys may repeat (one `alternatives` pair per entry).
pub type Params = Vec<(&'static str, String)>;

// Shared by every session, built on first request. A failed build is kept
// and reported as unreachable on each call instead of panicking.
static HTTP_CLIENT: LazyLock<reqwest::Result<Client>> =
    LazyLock::new(|| Client::builder().build());

fn http_client() -> Result<&'static Client, FetchError> {
    HTTP_CLIENT
        .as_ref()
        .map_err(|err| FetchError::Transport(err.to_string()))
}

#[derive(Clone, Debug)]
pub struct SixpackHttpClient {
    host: String,
    timeout: Duration,
    user_agent: Option<String>,
    ip_address: Option<String>,
}

impl SixpackHttpClient {
    pub fn new(options: SessionOptions, params: SessionParams) -> Self {
        Self {
            host: options.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            timeout: options.timeout.unwrap_or(DEFAULT_TIMEOUT),
            user_agent: params.user_agent,
            ip_address: params.ip_address,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn ip_address(&self) -> Option<&str> {
        self.ip_address.as_deref()
    }

    /// Appends the session context to the endpoint parameters.
    pub fn build_params(&self, mut params: Params) -> Params {
        if let Some(ip_address) = &self.ip_address {
            params.push(("ip_address", ip_address.clone()));
        }
        if let Some(user_agent) = &self.user_agent {
            params.push(("user_agent", user_agent.clone()));
        }
        params
    }

    /// Sends a GET to `{host}{endpoint}` and normalizes whatever happens into
    /// a `SixpackResponse`. Never fails.
    pub async fn get_response(&self, endpoint: &str, params: Params) -> SixpackResponse {
        // host is trusted verbatim, no slash normalization
        let url = format!("{}{}", self.host, endpoint);
        let params = self.build_params(params);

        event!(Level::DEBUG, "Sending sixpack request to {}", url);
        match self.fetch(&url, &params).await {
            Ok(response) => response,
            Err(err) => {
                event!(Level::WARN, "Sixpack request to {} failed: {}", url, err);
                err.into_response()
            }
        }
    }

    async fn fetch(&self, url: &str, params: &Params) -> Result<SixpackResponse, FetchError> {
        let res = http_client()?
            .get(url)
            .query(params)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = res.status();
        let body = res.bytes().await?;
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            source,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

impl FetchError {
    fn into_response(self) -> SixpackResponse {
        match self {
            FetchError::Unreachable(_) | FetchError::Transport(_) => {
                SixpackResponse::failed(UNREACHABLE)
            }
            FetchError::Status { body, .. } | FetchError::Decode { body, .. } => {
                SixpackResponse::failed(body)
            }
        }
    }
}
