use reqwest::blocking::Response;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// What the classifier needs from a received HTTP response.
pub trait RawResponse {
    fn status_code(&self) -> u16;

    /// Raw body text.
    fn text(&self) -> &str;

    /// URL the response was read from, when known.
    fn url(&self) -> Option<&str> {
        None
    }

    /// Parse the body as JSON.
    fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(self.text())
    }
}

/// A fully buffered response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    url: Option<String>,
    body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            url: None,
            body: body.into(),
        }
    }

    /// Drain a `reqwest` response into memory.
    pub fn read(response: Response) -> Result<Self> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response.text()?;
        tracing::debug!(status, %url, bytes = body.len(), "response received");
        Ok(Self {
            status,
            url: Some(url),
            body,
        })
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl RawResponse for ApiResponse {
    fn status_code(&self) -> u16 {
        self.status
    }

    fn text(&self) -> &str {
        &self.body
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl<R: RawResponse> RawResponse for &R {
    fn status_code(&self) -> u16 {
        (**self).status_code()
    }

    fn text(&self) -> &str {
        (**self).text()
    }

    fn url(&self) -> Option<&str> {
        (**self).url()
    }
}
