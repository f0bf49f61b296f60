//! Environment-driven shell configuration.

use std::{path::PathBuf, time::Duration};

use crate::{
    asset_protocol::UnknownMimePolicy,
    load_retry::RetryPolicy,
    route_table::RouteOrder,
};

pub const DEV_SERVER_ENV: &str = "APPSHELL_DEV_SERVER";
pub const NPM_LIFECYCLE_EVENT_ENV: &str = "npm_lifecycle_event";
pub const NPM_SERVE_LIFECYCLE: &str = "serve";
pub const DEV_URL_ENV: &str = "APPSHELL_DEV_URL";
pub const WEBUI_DIR_ENV: &str = "APPSHELL_WEBUI_DIR";
pub const ROOT_DIR_ENV: &str = "APPSHELL_ROOT";
pub const LOAD_RETRIES_ENV: &str = "APPSHELL_LOAD_RETRIES";
pub const LOAD_RETRY_DELAY_MS_ENV: &str = "APPSHELL_LOAD_RETRY_DELAY_MS";
pub const UNKNOWN_MIME_ENV: &str = "APPSHELL_UNKNOWN_MIME";
pub const ROUTE_ORDER_ENV: &str = "APPSHELL_ROUTE_ORDER";
pub const OPEN_DEVTOOLS_ENV: &str = "APPSHELL_OPEN_DEVTOOLS";
pub const HARDWARE_ACCELERATION_ENV: &str = "APPSHELL_HARDWARE_ACCELERATION";

pub const DEFAULT_DEV_URL: &str = "http://localhost:3000";
pub const APP_SCHEME: &str = "app";
pub const STORAGE_SCHEME: &str = "storage";

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_empty(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub development_server: bool,
    pub dev_url: String,
    pub webui_dir: Option<PathBuf>,
    pub retry: RetryPolicy,
    pub unknown_mime: UnknownMimePolicy,
    pub route_order: RouteOrder,
    pub open_devtools: bool,
    pub hardware_acceleration: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            development_server: false,
            dev_url: DEFAULT_DEV_URL.to_string(),
            webui_dir: None,
            retry: RetryPolicy::default(),
            unknown_mime: UnknownMimePolicy::default(),
            route_order: RouteOrder::default(),
            open_devtools: cfg!(debug_assertions),
            hardware_acceleration: false,
        }
    }
}

impl ShellConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from `lookup`, keeping defaults for unset or unparsable values.
    pub fn from_lookup<L>(lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| {
            lookup(key)
                .as_deref()
                .and_then(parse_flag)
                .unwrap_or(default)
        };

        let development_server = flag(DEV_SERVER_ENV, false)
            || lookup(NPM_LIFECYCLE_EVENT_ENV).as_deref().map(str::trim)
                == Some(NPM_SERVE_LIFECYCLE);

        let retry = RetryPolicy {
            max_retries: lookup(LOAD_RETRIES_ENV)
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(defaults.retry.max_retries),
            delay: lookup(LOAD_RETRY_DELAY_MS_ENV)
                .and_then(|value| value.trim().parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry.delay),
        };

        Self {
            development_server,
            dev_url: lookup(DEV_URL_ENV)
                .and_then(non_empty)
                .unwrap_or(defaults.dev_url),
            webui_dir: lookup(WEBUI_DIR_ENV).and_then(non_empty).map(PathBuf::from),
            retry,
            unknown_mime: lookup(UNKNOWN_MIME_ENV)
                .as_deref()
                .and_then(UnknownMimePolicy::parse)
                .unwrap_or(defaults.unknown_mime),
            route_order: lookup(ROUTE_ORDER_ENV)
                .as_deref()
                .and_then(RouteOrder::parse)
                .unwrap_or(defaults.route_order),
            open_devtools: flag(OPEN_DEVTOOLS_ENV, defaults.open_devtools),
            hardware_acceleration: flag(
                HARDWARE_ACCELERATION_ENV,
                defaults.hardware_acceleration,
            ),
        }
    }

    pub fn entry_url(&self) -> String {
        if self.development_server {
            self.dev_url.clone()
        } else {
            packaged_entry_url(APP_SCHEME)
        }
    }
}

/// Entry document of the bundled front-end, on its hash-history root.
///
/// WebView2 and Android rewrite custom schemes to `http://<scheme>.localhost/`.
pub fn packaged_entry_url(scheme: &str) -> String {
    if cfg!(any(target_os = "windows", target_os = "android")) {
        format!("http://{scheme}.localhost/#/")
    } else {
        format!("{scheme}://index.html/#/")
    }
}
