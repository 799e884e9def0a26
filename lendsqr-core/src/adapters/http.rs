//! Users REST API client
//!
//! Talks to the generic JSON server that exposes `GET /users` and
//! `GET /users/{id}`.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value as JsonValue;
use url::Url;

use crate::domain::result::{Error, Result};
use crate::domain::User;
use crate::ports::UserApi;

/// Request timeout for the users API
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Blocking HTTP client for the users API
#[derive(Debug)]
pub struct HttpUserApi {
    client: Client,
    base_url: Url,
    base_url_str: String,
}

impl HttpUserApi {
    /// Create a client for `base_url` (must be http or https)
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("Invalid API base URL '{}': {}", base_url, e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(Error::Config(format!(
                "API base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if parsed.cannot_be_a_base() {
            return Err(Error::Config(format!("API base URL '{}' cannot be a base", base_url)));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::sync(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url_str: base_url.trim_end_matches('/').to_string(),
            base_url: parsed,
        })
    }

    /// Build `<base>/<segments...>`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config("API base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::sync(format!(
                "Connection timed out after {} seconds",
                REQUEST_TIMEOUT_SECS
            ))
        } else if error.is_connect() {
            Error::sync(format!("Unable to connect to {}", self.base_url_str))
        } else {
            Error::sync(format!("Request failed: {}", error))
        }
    }
}

impl UserApi for HttpUserApi {
    fn base_url(&self) -> &str {
        &self.base_url_str
    }

    fn fetch_users(&self) -> Result<Vec<User>> {
        let url = self.endpoint(&["users"])?;

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::sync(format!(
                "API responded with status: {}",
                status.as_u16()
            )));
        }

        let body: JsonValue = response
            .json()
            .map_err(|e| Error::sync(format!("Failed to parse users response: {}", e)))?;

        match body {
            JsonValue::Array(items) if !items.is_empty() => {
                Ok(serde_json::from_value(JsonValue::Array(items))?)
            }
            _ => Err(Error::sync("Invalid API response format")),
        }
    }

    fn fetch_user(&self, id: &str) -> Result<Option<User>> {
        let url = self.endpoint(&["users", id])?;

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| self.map_request_error(e))?;

        match response.status() {
            status if status.is_success() => {
                let user: User = response
                    .json()
                    .map_err(|e| Error::sync(format!("Failed to parse user {}: {}", id, e)))?;
                Ok(Some(user))
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(Error::sync(format!(
                "API responded with status: {}",
                status.as_u16()
            ))),
        }
    }
}
