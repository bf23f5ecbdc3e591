//! Egnyte public API client.
//!
//! The interesting part of this crate is how it turns HTTP responses into
//! typed failures: [`ErrorMapping`] maps a status code to a [`FailureKind`]
//! and [`extract_errors`] recovers the individual error records from the
//! many shapes Egnyte error bodies come in.
//!
//! # Quick Start
//!
//! ```
//! use egnyte_client::{mapping, ApiResponse, FailureKind};
//!
//! let response = ApiResponse::new(404, r#"{"errors": {"code": 12, "message": "missing"}}"#);
//! let err = mapping::DEFAULT.check_response(response).unwrap_err();
//! assert_eq!(err.kind(), Some(FailureKind::NotFound));
//! assert_eq!(err.status(), Some(404));
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod mapping;
pub mod models;
pub mod response;

// Re-export the main public types at the crate root for convenience.
pub use client::{AuthStrategy, EgnyteClient, FilesClient, LinksClient};
pub use config::Config;
pub use error::{Details, EgnyteError, ErrorDetail, FailureKind, Result};
pub use extract::{extract_errors, ErrorRecords};
pub use mapping::{ErrorMapping, CREATED, DEFAULT};
pub use models::{
    AccessToken, FileInfo, FolderInfo, Link, LinkAccessibility, LinkEntry, LinkKind, LinkSet,
    NewLink,
};
pub use response::{ApiResponse, RawResponse};
