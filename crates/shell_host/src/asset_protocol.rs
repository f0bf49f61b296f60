//! Buffer-mode resolution for the bundled front-end scheme (`app://`).
//!
//! Every request is resolved independently against the asset root: the URL path is decoded,
//! joined onto the root without ever leaving it, read from disk and tagged with the primary MIME
//! type from [`crate::mime_table`]. Nothing is cached between requests.

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

use percent_encoding::percent_decode_str;
use thiserror::Error;
use url::Url;

use crate::mime_table;

pub const DEFAULT_DOCUMENT: &str = "index.html";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("invalid request path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },
    #[error("request path `{path}` escapes the asset root")]
    Traversal { path: String },
    #[error("asset {} not found", .path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read asset {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no content type known for `{path}`")]
    UnknownContentType { path: String },
}

impl AssetError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidPath { .. } => 400,
            Self::Traversal { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::UnknownContentType { .. } => 415,
            Self::Unreadable { .. } => 500,
        }
    }

    pub(crate) fn from_io(path: PathBuf, error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Unreadable {
                path,
                source: error,
            }
        }
    }
}

/// What to do with a file whose extension is missing from the content-type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownMimePolicy {
    /// Fail the request with [`AssetError::UnknownContentType`].
    #[default]
    Reject,
    /// Serve the bytes as `application/octet-stream`.
    OctetStream,
}

impl UnknownMimePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "reject" | "fail" => Some(Self::Reject),
            "octet-stream" | "octet" | "binary" => Some(Self::OctetStream),
            _ => None,
        }
    }
}

/// A decoded logical path, always starting with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    logical_path: String,
}

impl ResourceRequest {
    pub fn from_uri(uri: &str, default_document: &str) -> Result<Self, AssetError> {
        let parsed = Url::parse(uri).map_err(|error| AssetError::InvalidPath {
            path: uri.to_string(),
            reason: error.to_string(),
        })?;
        Self::from_path(parsed.path(), default_document)
    }

    pub fn from_path(raw_path: &str, default_document: &str) -> Result<Self, AssetError> {
        let decoded = percent_decode_str(raw_path)
            .decode_utf8()
            .map_err(|error| AssetError::InvalidPath {
                path: raw_path.to_string(),
                reason: error.to_string(),
            })?;

        let logical_path = match decoded.as_ref() {
            "" | "/" => format!("/{default_document}"),
            path if path.starts_with('/') => path.to_string(),
            path => format!("/{path}"),
        };
        Ok(Self { logical_path })
    }

    pub fn logical_path(&self) -> &str {
        &self.logical_path
    }
}

/// Joins `logical_path` onto `root`, resolving `.`/`..` lexically and refusing any segment that
/// would climb above the root or smuggle in a platform path prefix.
pub(crate) fn join_within_root(root: &Path, logical_path: &str) -> Result<PathBuf, AssetError> {
    let traversal = || AssetError::Traversal {
        path: logical_path.to_string(),
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in logical_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop().ok_or_else(traversal)?;
            }
            segment => {
                if segment.contains('\\') || segment.contains('\0') {
                    return Err(traversal());
                }
                let mut components = Path::new(segment).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(_)), None) => segments.push(segment),
                    _ => return Err(traversal()),
                }
            }
        }
    }

    let mut joined = root.to_path_buf();
    joined.extend(segments);
    Ok(joined)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedAsset {
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// The completed reply for one scheme request. Failures carry an empty body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub mime_type: Option<&'static str>,
    pub body: Vec<u8>,
}

impl AssetResponse {
    pub fn ok(mime_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            mime_type: Some(mime_type),
            body,
        }
    }

    pub fn from_error(error: &AssetError) -> Self {
        Self {
            status: error.status_code(),
            mime_type: None,
            body: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssetResolver {
    root: PathBuf,
    default_document: String,
    unknown_mime: UnknownMimePolicy,
}

impl AssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            default_document: DEFAULT_DOCUMENT.to_string(),
            unknown_mime: UnknownMimePolicy::default(),
        }
    }

    pub fn with_unknown_mime_policy(mut self, policy: UnknownMimePolicy) -> Self {
        self.unknown_mime = policy;
        self
    }

    pub fn with_default_document(mut self, document: impl Into<String>) -> Self {
        self.default_document = document.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, uri: &str) -> Result<BufferedAsset, AssetError> {
        let request = ResourceRequest::from_uri(uri, &self.default_document)?;
        self.resolve_request(&request)
    }

    pub fn resolve_request(&self, request: &ResourceRequest) -> Result<BufferedAsset, AssetError> {
        let logical_path = request.logical_path();
        let candidate = join_within_root(&self.root, logical_path)?;

        let canonical_root = fs::canonicalize(&self.root)
            .map_err(|error| AssetError::from_io(self.root.clone(), error))?;
        let canonical = fs::canonicalize(&candidate)
            .map_err(|error| AssetError::from_io(candidate.clone(), error))?;
        if !canonical.starts_with(&canonical_root) {
            return Err(AssetError::Traversal {
                path: logical_path.to_string(),
            });
        }

        let bytes =
            fs::read(&canonical).map_err(|error| AssetError::from_io(candidate.clone(), error))?;

        let mime_type = match (mime_table::mime_for_path(&candidate), self.unknown_mime) {
            (Some(mime_type), _) => mime_type,
            (None, UnknownMimePolicy::OctetStream) => mime_table::OCTET_STREAM,
            (None, UnknownMimePolicy::Reject) => {
                return Err(AssetError::UnknownContentType {
                    path: logical_path.to_string(),
                })
            }
        };

        Ok(BufferedAsset { mime_type, bytes })
    }

    /// Resolves `uri` into exactly one response. Failures are logged and answered with an
    /// empty-bodied error status; they never reach the caller as an error.
    pub fn respond<F>(&self, uri: &str, log: F) -> AssetResponse
    where
        F: Fn(&str),
    {
        match self.resolve(uri) {
            Ok(asset) => AssetResponse::ok(asset.mime_type, asset.bytes),
            Err(error) => {
                log(&format!("failed to resolve {uri}: {error}"));
                AssetResponse::from_error(&error)
            }
        }
    }
}
