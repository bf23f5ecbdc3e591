use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Url;
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::{ErrorDetail, FailureKind, Result};
use crate::mapping::{CREATED, DEFAULT};
use crate::models::*;
use crate::response::{ApiResponse, RawResponse};

const FS_ENDPOINT: [&str; 3] = ["pubapi", "v1", "fs"];
const LINKS_ENDPOINT: [&str; 3] = ["pubapi", "v1", "links"];
const TOKEN_ENDPOINT: [&str; 2] = ["puboauth", "token"];

/// OAuth flows a client may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Username and password exchanged directly for a token.
    ResourceOwnerPassword,
    AuthorizationCode,
    Implicit,
}

// ---------------------------------------------------------------------------
// Internal request handling
// ---------------------------------------------------------------------------

/// Shared logic for building a configured [`Client`] and making requests.
struct BaseClient {
    base_url: Url,
    http: Client,
}

impl BaseClient {
    fn new(config: &Config) -> Result<Self> {
        let base = config.base_url()?;
        let base_url = Url::parse(&base).map_err(|e| {
            FailureKind::InvalidParameters.with_details(ErrorDetail::from(json!({
                "base_url": base,
                "message": e.to_string(),
            })))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(FailureKind::InvalidParameters
                .with_details(ErrorDetail::from(json!({"base_url": base}))));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = config.access_token.as_deref() {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                FailureKind::InvalidParameters.with_details(ErrorDetail::from(json!({
                    "access_token": "not a valid header value",
                    "message": e.to_string(),
                })))
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        let agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| concat!("egnyte-client/", env!("CARGO_PKG_VERSION")).to_string());
        let agent = HeaderValue::from_str(&agent).map_err(|e| {
            FailureKind::InvalidParameters.with_details(ErrorDetail::from(json!({
                "user_agent": agent,
                "message": e.to_string(),
            })))
        })?;
        headers.insert(USER_AGENT, agent);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self { base_url, http })
    }

    /// Build the full URL from fixed endpoint segments and a slash-separated
    /// resource path. Each segment is percent-encoded.
    fn url(&self, endpoint: &[&str], path: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(endpoint)
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url
    }

    fn send(&self, request: RequestBuilder) -> Result<ApiResponse> {
        let response = request.send()?;
        ApiResponse::read(response)
    }

    // ---- convenience wrappers for common HTTP verbs -----------------------

    fn get(&self, url: Url) -> Result<ApiResponse> {
        tracing::debug!(method = "GET", %url, "sending request");
        self.send(self.http.get(url))
    }

    fn post_json(&self, url: Url, body: &Value) -> Result<ApiResponse> {
        tracing::debug!(method = "POST", %url, "sending request");
        self.send(self.http.post(url).json(body))
    }

    fn delete(&self, url: Url) -> Result<ApiResponse> {
        tracing::debug!(method = "DELETE", %url, "sending request");
        self.send(self.http.delete(url))
    }
}

// ---------------------------------------------------------------------------
// Public client
// ---------------------------------------------------------------------------

/// Entry point for the Egnyte public API.
///
/// ```no_run
/// use egnyte_client::{Config, EgnyteClient};
///
/// let client = EgnyteClient::new(&Config::from_env()).unwrap();
/// let shared = client.files().folder_info("/Shared").unwrap();
/// for folder in &shared.folders {
///     println!("{}", folder.path);
/// }
/// ```
pub struct EgnyteClient {
    base: BaseClient,
    config: Config,
}

impl EgnyteClient {
    /// Create a new client. Fails with
    /// [`FailureKind::DomainRequired`] when neither a domain nor a base URL
    /// is configured.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            base: BaseClient::new(config)?,
            config: config.clone(),
        })
    }

    /// Exchange configured credentials for an access token.
    ///
    /// Only [`AuthStrategy::ResourceOwnerPassword`] can be completed without
    /// a browser; other strategies fail with
    /// [`FailureKind::UnsupportedAuthStrategy`] before any request is sent.
    pub fn request_access_token(&self, strategy: AuthStrategy) -> Result<AccessToken> {
        if strategy != AuthStrategy::ResourceOwnerPassword {
            return Err(FailureKind::UnsupportedAuthStrategy
                .with_details(ErrorDetail::from(json!({"strategy": format!("{strategy:?}")}))));
        }
        let form = self.config.password_grant_form()?;
        let url = self.base.url(&TOKEN_ENDPOINT, "");
        tracing::debug!(method = "POST", %url, "requesting access token");
        let response = self.base.send(self.base.http.post(url).form(&form))?;
        DEFAULT.check_json_response(response)
    }

    // -- sub-client accessors ------------------------------------------------

    pub fn files(&self) -> FilesClient<'_> {
        FilesClient { base: &self.base }
    }

    pub fn links(&self) -> LinksClient<'_> {
        LinksClient { base: &self.base }
    }
}

// ===========================================================================
// Sub-clients
// ===========================================================================

// ---- File system ----------------------------------------------------------

pub struct FilesClient<'a> {
    base: &'a BaseClient,
}

impl FilesClient<'_> {
    /// List a folder.
    pub fn folder_info(&self, path: &str) -> Result<FolderInfo> {
        let response = self.base.get(self.base.url(&FS_ENDPOINT, path))?;
        DEFAULT.check_json_response(response)
    }

    /// Metadata of a file. A folder at `path` is a
    /// [`FailureKind::FileExpected`] failure.
    pub fn file_info(&self, path: &str) -> Result<FileInfo> {
        let response = self.base.get(self.base.url(&FS_ENDPOINT, path))?;
        let entry: Value = DEFAULT.check_json_response(&response)?;
        if entry.get("is_folder").and_then(Value::as_bool) == Some(true) {
            return Err(FailureKind::FileExpected.with_details(ErrorDetail::from(json!({"path": path}))));
        }
        serde_json::from_value(entry).map_err(|_| {
            FailureKind::JsonParseError.with_details(ErrorDetail::http_response(response.text()))
        })
    }

    /// Create a folder; the API answers `201 Created`.
    pub fn create_folder(&self, path: &str) -> Result<()> {
        let url = self.base.url(&FS_ENDPOINT, path);
        let response = self.base.post_json(url, &json!({"action": "add_folder"}))?;
        CREATED.check_response(response)?;
        Ok(())
    }

    /// Delete a file or folder.
    pub fn delete(&self, path: &str) -> Result<()> {
        let response = self.base.delete(self.base.url(&FS_ENDPOINT, path))?;
        DEFAULT.check_response(response)?;
        Ok(())
    }
}

// ---- Links ----------------------------------------------------------------

pub struct LinksClient<'a> {
    base: &'a BaseClient,
}

impl LinksClient<'_> {
    /// Create links to a file or folder, one per recipient.
    pub fn create(&self, link: &NewLink) -> Result<LinkSet> {
        let body = serde_json::to_value(link).map_err(|e| {
            FailureKind::InvalidParameters
                .with_details(ErrorDetail::from(json!({"message": e.to_string()})))
        })?;
        let response = self.base.post_json(self.base.url(&LINKS_ENDPOINT, ""), &body)?;
        DEFAULT.check_json_response(response)
    }

    pub fn get(&self, id: &str) -> Result<Link> {
        let response = self.base.get(self.base.url(&LINKS_ENDPOINT, id))?;
        DEFAULT.check_json_response(response)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let response = self.base.delete(self.base.url(&LINKS_ENDPOINT, id))?;
        DEFAULT.check_response(response)?;
        Ok(())
    }
}
