pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const MAIN_WINDOW_TITLE: &str = "App";
pub(crate) const MAIN_WINDOW_WIDTH: f64 = 1280.0;
pub(crate) const MAIN_WINDOW_HEIGHT: f64 = 800.0;
pub(crate) const BLANK_PAGE_URL: &str = "about:blank";

pub(crate) const WEBUI_RESOURCE_DIR: &str = "webui";
pub(crate) const WEBUI_DEV_DIR: &str = "dist";
pub(crate) const APP_DATA_DIR_NAME: &str = ".appshell";

pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const DESKTOP_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;

pub(crate) const BRIDGE_COMMAND: &str = "desktop_bridge_invoke";
pub(crate) const DEV_SERVER_PROBE_TIMEOUT_MS: u64 = 800;

pub(crate) const LINUX_DISABLE_COMPOSITING_ENV: &str = "WEBKIT_DISABLE_COMPOSITING_MODE";
#[cfg(target_os = "windows")]
pub(crate) const WINDOWS_DISABLE_GPU_ARGS: &str = "--disable-gpu";
