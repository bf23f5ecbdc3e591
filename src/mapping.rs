//! HTTP status classification.
//!
//! [`ErrorMapping`] decides whether a response is a success and, when it is
//! not, builds the matching [`EgnyteError`] from the body.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Details, EgnyteError, ErrorDetail, FailureKind, Result};
use crate::extract::extract_errors;
use crate::response::RawResponse;

pub const OK: u16 = 200;
pub const CREATED_STATUS: u16 = 201;

const BASE_TABLE: [(u16, FailureKind); 6] = [
    (400, FailureKind::RequestError),
    (401, FailureKind::NotAuthorized),
    (403, FailureKind::InsufficientPermissions),
    (404, FailureKind::NotFound),
    (409, FailureKind::DuplicateRecordExists),
    (413, FailureKind::FileSizeExceedsLimit),
];

/// Mapping used by plain requests, accepts `200 OK`.
pub static DEFAULT: LazyLock<ErrorMapping> = LazyLock::new(ErrorMapping::new);

/// Mapping used by creation requests, accepts `201 Created`.
pub static CREATED: LazyLock<ErrorMapping> =
    LazyLock::new(|| ErrorMapping::new().accepting([CREATED_STATUS]));

/// Status → [`FailureKind`] table plus the statuses counted as success.
///
/// Unmapped statuses become [`FailureKind::RequestError`]. Clone a shared
/// mapping to customize it:
///
/// ```
/// use egnyte_client::{mapping, FailureKind};
///
/// let mut lenient = mapping::DEFAULT.clone().accepting([200, 204]);
/// lenient.set_override(422, FailureKind::InvalidParameters);
/// assert_eq!(mapping::DEFAULT.map_error(422), FailureKind::RequestError);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMapping {
    overrides: BTreeMap<u16, FailureKind>,
    accepted: Vec<u16>,
}

impl Default for ErrorMapping {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorMapping {
    pub fn new() -> Self {
        Self {
            overrides: BTreeMap::new(),
            accepted: vec![OK],
        }
    }

    pub fn with_override(mut self, status: u16, kind: FailureKind) -> Self {
        self.set_override(status, kind);
        self
    }

    /// Replace the accepted statuses. An empty set keeps the current one,
    /// as an empty slice does for [`check_response_accepting`](Self::check_response_accepting).
    pub fn accepting(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        let statuses: Vec<u16> = statuses.into_iter().collect();
        if !statuses.is_empty() {
            self.accepted = statuses;
        }
        self
    }

    pub fn set_override(&mut self, status: u16, kind: FailureKind) {
        self.overrides.insert(status, kind);
    }

    pub fn accepted_statuses(&self) -> &[u16] {
        &self.accepted
    }

    pub fn map_error(&self, status: u16) -> FailureKind {
        self.overrides
            .get(&status)
            .copied()
            .or_else(|| {
                BASE_TABLE
                    .iter()
                    .find(|(code, _)| *code == status)
                    .map(|(_, kind)| *kind)
            })
            .unwrap_or(FailureKind::RequestError)
    }

    /// Return `response` unchanged if its status is accepted, otherwise the
    /// classified failure.
    pub fn check_response<R: RawResponse>(&self, response: R) -> Result<R> {
        self.check_response_accepting(response, &[])
    }

    /// Like [`check_response`](Self::check_response) with an explicit
    /// accepted set. An empty slice falls back to the mapping's own.
    pub fn check_response_accepting<R: RawResponse>(
        &self,
        response: R,
        accepted: &[u16],
    ) -> Result<R> {
        let accepted = if accepted.is_empty() {
            self.accepted.as_slice()
        } else {
            accepted
        };
        if accepted.contains(&response.status_code()) {
            return Ok(response);
        }
        Err(self.failure(&response))
    }

    /// Check the status, then parse the body.
    ///
    /// A body that cannot be parsed after an accepted status is a
    /// [`FailureKind::JsonParseError`] carrying only the raw text.
    pub fn check_json_response<T, R>(&self, response: R) -> Result<T>
    where
        T: DeserializeOwned,
        R: RawResponse,
    {
        self.check_json_response_accepting(response, &[])
    }

    pub fn check_json_response_accepting<T, R>(&self, response: R, accepted: &[u16]) -> Result<T>
    where
        T: DeserializeOwned,
        R: RawResponse,
    {
        let response = self.check_response_accepting(response, accepted)?;
        response.json().map_err(|err| {
            tracing::debug!(error = %err, "accepted response is not valid JSON");
            FailureKind::JsonParseError.with_details(ErrorDetail::http_response(response.text()))
        })
    }

    fn failure<R: RawResponse>(&self, response: &R) -> EgnyteError {
        let status = response.status_code();
        let kind = self.map_error(status);

        let mut details: Details = match response.json::<Value>() {
            Ok(data) => extract_errors(&data).collect(),
            Err(err) => {
                tracing::warn!(status, error = %err, "error response body is not JSON");
                ErrorDetail::http_response(response.text()).into()
            }
        };
        details.push(ErrorDetail::http_status(status));

        tracing::debug!(
            status,
            ?kind,
            url = response.url().unwrap_or_default(),
            records = details.len(),
            "response classified as failure"
        );
        kind.with_details(details)
    }
}
