//! The client error type.

use canvas_tools_util::{FileError, JsonError};
use reqwest::{Method, StatusCode};
use thiserror::Error;
use url::Url;

pub type CanvasClientResult<T> = Result<T, CanvasClientError>;

/// The main error type for canvas-tools-client.
#[derive(Debug, Error)]
pub enum CanvasClientError {
    #[error("HTTP error {status} for {url}: {error}")]
    HttpError {
        url: Url,
        status: StatusCode,
        error: String,
    },
    #[error("Connection error trying to {0} {1}")]
    ConnectionError(Method, Url, #[source] reqwest::Error),
    #[error("Failed to parse as URL: {0}")]
    UrlParse(String, #[source] url::ParseError),
    #[error("Failed to build {0} request to {1}")]
    RequestBuild(Method, Url, #[source] reqwest::Error),
    #[error("Failed to write response")]
    HttpWriteResponse(#[source] reqwest::Error),
    #[error("Failed to read response")]
    HttpReadResponse(#[source] reqwest::Error),
    #[error("Failed to deserialize response from {0} as JSON")]
    HttpJsonResponse(Url, #[source] JsonError),
    #[error("Failed to build HTTP client")]
    HttpClientBuilder(#[source] reqwest::Error),

    #[error(transparent)]
    FileError(#[from] FileError),
}
