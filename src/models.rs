use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// OAuth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Seconds; `-1` means the token does not expire.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

// ---------------------------------------------------------------------------
// File system
// ---------------------------------------------------------------------------

/// A file entry as listed by `GET /pubapi/v1/fs/{path}`.
#[derive(Debug, Clone, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub is_folder: bool,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub checksum: Option<String>,
    #[serde(default)]
    pub entry_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FolderInfo {
    pub name: String,
    pub path: String,
    #[serde(default = "folder_flag")]
    pub is_folder: bool,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub folders: Vec<FolderInfo>,
    #[serde(default)]
    pub files: Vec<FileInfo>,
}

fn folder_flag() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkAccessibility {
    Anyone,
    Password,
    Domain,
    Recipients,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    File,
    Folder,
}

/// Body of `POST /pubapi/v1/links`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLink {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub accessibility: LinkAccessibility,
    pub send_email: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<String>,
}

/// One link of a [`LinkSet`]; one is created per recipient.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkEntry {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub recipients: Vec<String>,
}

/// Response of a link creation.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkSet {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub accessibility: LinkAccessibility,
    pub links: Vec<LinkEntry>,
    #[serde(default)]
    pub creation_date: Option<String>,
}

/// Response of `GET /pubapi/v1/links/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub accessibility: LinkAccessibility,
    pub url: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
}
