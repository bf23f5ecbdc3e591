use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Category of a failure surfaced by the client.
///
/// Most kinds are produced by [`ErrorMapping`](crate::mapping::ErrorMapping)
/// from a non-accepted HTTP status. The `*Required` kinds and
/// `UnsupportedAuthStrategy` are client-side preconditions and are raised
/// before any request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    InvalidParameters,
    InsufficientPermissions,
    NotFound,
    NotAuthorized,
    JsonParseError,
    DomainRequired,
    ClientIdRequired,
    OAuthUsernameRequired,
    OAuthPasswordRequired,
    UnsupportedAuthStrategy,
    RequestError,
    FileExpected,
    DuplicateRecordExists,
    FileSizeExceedsLimit,
}

impl FailureKind {
    /// Build the error value for this kind, carrying `details` in order.
    pub fn with_details(self, details: impl Into<Details>) -> EgnyteError {
        EgnyteError::Api {
            kind: self,
            details: details.into(),
        }
    }

    /// Kinds that never come from an HTTP response.
    pub fn is_client_side(self) -> bool {
        matches!(
            self,
            Self::DomainRequired
                | Self::ClientIdRequired
                | Self::OAuthUsernameRequired
                | Self::OAuthPasswordRequired
                | Self::UnsupportedAuthStrategy
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::InvalidParameters => "Invalid parameters were passed to an API request",
            Self::InsufficientPermissions => {
                "User does not have sufficient permissions to perform this action"
            }
            Self::NotFound => "Resource with name does not exist",
            Self::NotAuthorized => "Access token is required",
            Self::JsonParseError => "Response from the server could not be parsed properly",
            Self::DomainRequired => "Domain name is required",
            Self::ClientIdRequired => "Client id is required",
            Self::OAuthUsernameRequired => "Username is required for OAuth authentication",
            Self::OAuthPasswordRequired => "Password is required for OAuth authentication",
            Self::UnsupportedAuthStrategy => "This OAuth flow is not supported by this API key",
            Self::RequestError => "Request error",
            Self::FileExpected => "Expected a file but found a folder",
            Self::DuplicateRecordExists => "Existing entity conflict",
            Self::FileSizeExceedsLimit => "File is too large for this operation",
        };
        f.write_str(msg)
    }
}

/// One error record recovered from a response body.
///
/// Usually an object such as `{"code": ..., "message": ...}`, but any JSON
/// value is kept when the body does not follow a recognizable shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ErrorDetail(Value);

impl ErrorDetail {
    pub const HTTP_RESPONSE: &'static str = "http response";
    pub const HTTP_STATUS: &'static str = "http status";

    /// `{"http response": <text>}`, used when the body is not structured data.
    pub fn http_response(text: impl Into<String>) -> Self {
        let mut record = serde_json::Map::new();
        record.insert(Self::HTTP_RESPONSE.into(), Value::String(text.into()));
        Self(Value::Object(record))
    }

    /// `{"http status": <code>}`, always the last record of a classified failure.
    pub fn http_status(status: u16) -> Self {
        let mut record = serde_json::Map::new();
        record.insert(Self::HTTP_STATUS.into(), Value::from(status));
        Self(Value::Object(record))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for ErrorDetail {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered error records attached to a failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Details(Vec<ErrorDetail>);

impl Details {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, detail: ErrorDetail) {
        self.0.push(detail);
    }

    pub fn as_slice(&self) -> &[ErrorDetail] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<ErrorDetail>> for Details {
    fn from(records: Vec<ErrorDetail>) -> Self {
        Self(records)
    }
}

impl From<ErrorDetail> for Details {
    fn from(record: ErrorDetail) -> Self {
        Self(vec![record])
    }
}

impl FromIterator<ErrorDetail> for Details {
    fn from_iter<I: IntoIterator<Item = ErrorDetail>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Details {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, detail) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{detail}")?;
        }
        f.write_str("]")
    }
}

/// Error type for Egnyte API operations.
///
/// - `Api` — a classified failure, see [`FailureKind`]
/// - `Transport` — network/transport errors (wraps `reqwest::Error`)
/// - `Config` — the configuration file could not be read
#[derive(Debug, Error)]
pub enum EgnyteError {
    #[error("{kind}: {details}")]
    Api { kind: FailureKind, details: Details },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EgnyteError {
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn details(&self) -> &[ErrorDetail] {
        match self {
            Self::Api { details, .. } => details.as_slice(),
            _ => &[],
        }
    }

    /// HTTP status of the response this failure was classified from.
    pub fn status(&self) -> Option<u16> {
        self.details()
            .last()?
            .get(ErrorDetail::HTTP_STATUS)?
            .as_u64()
            .and_then(|code| u16::try_from(code).ok())
    }
}

pub type Result<T> = std::result::Result<T, EgnyteError>;
