//! Shared HTTP client for source adapters
//!
//! One [`HttpClient`] is built from the explicit [`HttpConfig`] at startup and
//! cloned into every adapter. Failures are mapped into [`SourceError`] here so
//! adapters never inspect `reqwest` errors themselves.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::HttpConfig;
use crate::errors::{AppError, AppResult, SourceError, SourceResult};
use crate::utils::url::UrlUtils;

/// HTTP client with provider-facing defaults and typed error mapping
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    request_timeout: Duration,
}

impl HttpClient {
    /// Build the client from configuration
    pub fn new(config: &HttpConfig) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept)
                .map_err(|e| AppError::configuration(format!("Invalid accept header: {e}")))?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).map_err(|e| {
                AppError::configuration(format!("Invalid accept-language header: {e}"))
            })?,
        );

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            request_timeout: config.request_timeout,
        })
    }

    /// Fetch `url` and decode the body as JSON
    pub async fn get_json<T: DeserializeOwned>(&self, source_name: &str, url: &str) -> SourceResult<T> {
        let response = self.send(source_name, url).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_reqwest_error(source_name, e))?;

        debug!("{}: received {} bytes of JSON", source_name, body.len());

        serde_json::from_slice(&body)
            .map_err(|e| SourceError::parse(source_name, format!("invalid JSON payload: {e}")))
    }

    /// Fetch `url` and return the body as text
    pub async fn get_text(&self, source_name: &str, url: &str) -> SourceResult<String> {
        let response = self.send(source_name, url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| self.map_reqwest_error(source_name, e))?;

        debug!("{}: received {} characters of text", source_name, body.len());
        Ok(body)
    }

    async fn send(&self, source_name: &str, url: &str) -> SourceResult<Response> {
        debug!("{}: GET {}", source_name, UrlUtils::obfuscate_credentials(url));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(source_name, e))?;

        check_status(source_name, response.status())?;
        Ok(response)
    }

    fn map_reqwest_error(&self, source_name: &str, error: reqwest::Error) -> SourceError {
        if error.is_timeout() {
            return SourceError::timeout(source_name, self.request_timeout);
        }
        SourceError::transport(
            source_name,
            UrlUtils::obfuscate_credentials(&error.to_string()),
        )
    }
}

/// Classify a response status for `source_name`
///
/// 401 and 403 mean the credential was rejected; any other non-2xx status is
/// a transport failure.
pub fn check_status(source_name: &str, status: StatusCode) -> SourceResult<()> {
    if status.is_success() {
        return Ok(());
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SourceError::Unauthorized {
            source_name: source_name.to_string(),
            status: status.as_u16(),
        });
    }

    Err(SourceError::Http {
        source_name: source_name.to_string(),
        status: status.as_u16(),
        message: status.canonical_reason().unwrap_or("Unknown").to_string(),
    })
}
