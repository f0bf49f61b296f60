use std::{
    env,
    path::{Path, PathBuf},
};

use shell_host::{shell_config::ROOT_DIR_ENV, ShellConfig, DEFAULT_DOCUMENT};
use tauri::{path::BaseDirectory, AppHandle, Manager};

use crate::{APP_DATA_DIR_NAME, WEBUI_DEV_DIR, WEBUI_RESOURCE_DIR};

pub(crate) fn default_root_dir() -> Option<PathBuf> {
    if let Ok(root) = env::var(ROOT_DIR_ENV) {
        let path = PathBuf::from(root.trim());
        if !path.as_os_str().is_empty() {
            return Some(path);
        }
    }

    home::home_dir().map(|home| home.join(APP_DATA_DIR_NAME))
}

fn workspace_root_dir() -> PathBuf {
    let candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..");
    candidate.canonicalize().unwrap_or(candidate)
}

fn has_default_document(dir: &Path) -> bool {
    dir.join(DEFAULT_DOCUMENT).is_file()
}

fn resolve_resource_path(app: &AppHandle, relative_path: &str) -> Option<PathBuf> {
    app.path()
        .resolve(relative_path, BaseDirectory::Resource)
        .ok()
}

/// Picks the directory served under `app://`: explicit override, then the packaged `webui`
/// resource, then the workspace `dist` build used during development.
pub(crate) fn resolve_webui_dir<F>(app: &AppHandle, config: &ShellConfig, log: F) -> PathBuf
where
    F: Fn(&str),
{
    if let Some(dir) = &config.webui_dir {
        return dir.clone();
    }

    let packaged = resolve_resource_path(app, WEBUI_RESOURCE_DIR);
    select_webui_dir(packaged, workspace_root_dir().join(WEBUI_DEV_DIR), log)
}

fn select_webui_dir<F>(packaged: Option<PathBuf>, fallback: PathBuf, log: F) -> PathBuf
where
    F: Fn(&str),
{
    match packaged {
        Some(dir) if has_default_document(&dir) => dir,
        Some(dir) => {
            log(&format!(
                "packaged web ui at {} has no {DEFAULT_DOCUMENT}; using {}",
                dir.display(),
                fallback.display()
            ));
            fallback
        }
        None => fallback,
    }
}

/// Base directory of the `storage://` scheme.
pub(crate) fn storage_root_dir() -> PathBuf {
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
