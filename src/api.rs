//! Map generation service client.
//!
//! Thin HTTP wrapper for `POST /api/v1/map/generate`. Response parsing is a
//! pure function so it can be tested without a server.

use std::time::Duration;

use hexcanvas::map::{MapGenerationRequest, MapResponse};

use crate::config::HttpTimeouts;

pub const GENERATE_PATH: &str = "/api/v1/map/generate";
pub const MIN_HEXAGON_COUNT: u32 = 5;
pub const MAX_HEXAGON_COUNT: u32 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("hexagon count {0} outside {MIN_HEXAGON_COUNT}..={MAX_HEXAGON_COUNT}")]
    InvalidCount(u32),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API response error: status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API response parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

pub struct MapClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl MapClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: Option<String>, timeouts: HttpTimeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, endpoint: endpoint(base_url), api_key: api_key.filter(|k| !k.is_empty()) })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request a new map.
    ///
    /// # Errors
    ///
    /// Returns an error for an out-of-range count, a transport failure, a
    /// non-success status or an unparsable body.
    pub async fn generate(&self, request: &MapGenerationRequest) -> Result<MapResponse, ApiError> {
        validate(request)?;
        tracing::debug!(count = request.hexagon_count, seed = ?request.seed, "requesting map");

        let mut builder = self.http.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header("x-api-key", key);
        }
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        parse_response(status, &text)
    }
}

/// Full generate URL for a base URL with or without a trailing slash.
#[must_use]
pub fn endpoint(base_url: &str) -> String {
    format!("{}{GENERATE_PATH}", base_url.trim_end_matches('/'))
}

/// # Errors
///
/// Returns [`ApiError::InvalidCount`] when the count is outside the service's range.
pub fn validate(request: &MapGenerationRequest) -> Result<(), ApiError> {
    if (MIN_HEXAGON_COUNT..=MAX_HEXAGON_COUNT).contains(&request.hexagon_count) {
        Ok(())
    } else {
        Err(ApiError::InvalidCount(request.hexagon_count))
    }
}

/// # Errors
///
/// Returns [`ApiError::Status`] for non-2xx statuses and [`ApiError::Parse`]
/// for bodies that are not a map response.
pub fn parse_response(status: u16, body: &str) -> Result<MapResponse, ApiError> {
    if !(200..300).contains(&status) {
        return Err(ApiError::Status { status, body: body.to_owned() });
    }
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
