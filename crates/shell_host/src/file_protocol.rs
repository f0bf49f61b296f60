//! File-mode resolution for the `storage://` scheme.
//!
//! The request URL is mapped onto a path under the process working directory without checking
//! that it exists; the host then reads that path natively.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    asset_protocol::{join_within_root, AssetError, AssetResponse},
    mime_table,
};

/// Removes a leading `<scheme>://` and a single trailing `/`.
///
/// WebView2 and Android deliver custom schemes as `http(s)://<scheme>.localhost/`, which is
/// stripped the same way.
pub fn strip_scheme<'a>(scheme: &str, url: &'a str) -> &'a str {
    let prefixes = [
        format!("{scheme}://"),
        format!("http://{scheme}.localhost/"),
        format!("https://{scheme}.localhost/"),
    ];
    let without_scheme = prefixes
        .iter()
        .find_map(|prefix| url.strip_prefix(prefix.as_str()))
        .unwrap_or(url);
    without_scheme.strip_suffix('/').unwrap_or(without_scheme)
}

pub fn resolve_storage_path(scheme: &str, url: &str, cwd: &Path) -> Result<PathBuf, AssetError> {
    join_within_root(cwd, strip_scheme(scheme, url))
}

/// Resolves and reads a storage request, always producing one response.
pub fn serve_storage<F>(scheme: &str, url: &str, cwd: &Path, log: F) -> AssetResponse
where
    F: Fn(&str),
{
    let path = match resolve_storage_path(scheme, url, cwd) {
        Ok(path) => path,
        Err(error) => {
            log(&format!("rejected {url}: {error}"));
            return AssetResponse::from_error(&error);
        }
    };
    log(&format!("{url} -> {}", path.display()));

    match fs::read(&path) {
        Ok(bytes) => AssetResponse::ok(
            mime_table::mime_for_path(&path).unwrap_or(mime_table::OCTET_STREAM),
            bytes,
        ),
        Err(error) => {
            let error = AssetError::from_io(path, error);
            log(&format!("failed to serve {url}: {error}"));
            AssetResponse::from_error(&error)
        }
    }
}
