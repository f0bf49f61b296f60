use std::{
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
};

use shell_host::{AssetResolver, CancelFlag, CapabilityRegistry, ShellConfig};
use tauri::{AppHandle, Manager, WebviewWindow};

use crate::MAIN_WINDOW_LABEL;

/// Host state handed to capability handlers on every bridge call.
pub(crate) struct InjectParams {
    pub(crate) main_window: Option<WebviewWindow>,
    pub(crate) development_server: bool,
}

impl InjectParams {
    pub(crate) fn from_app(app_handle: &AppHandle, development_server: bool) -> Self {
        Self {
            main_window: app_handle.get_webview_window(MAIN_WINDOW_LABEL),
            development_server,
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WindowStateSnapshot {
    pub(crate) title: String,
    pub(crate) visible: bool,
    pub(crate) focused: bool,
    pub(crate) development_server: bool,
}

/// Application context built once in `setup`; the only owner of shell-wide state.
pub(crate) struct ShellState {
    pub(crate) config: ShellConfig,
    pub(crate) assets: AssetResolver,
    pub(crate) storage_root: PathBuf,
    pub(crate) bridge: CapabilityRegistry<InjectParams>,
    pub(crate) load_cancel: CancelFlag,
    devtools_opened: AtomicBool,
}

impl ShellState {
    pub(crate) fn new(
        config: ShellConfig,
        webui_dir: PathBuf,
        storage_root: PathBuf,
        bridge: CapabilityRegistry<InjectParams>,
    ) -> Self {
        let assets = AssetResolver::new(webui_dir).with_unknown_mime_policy(config.unknown_mime);
        Self {
            config,
            assets,
            storage_root,
            bridge,
            load_cancel: CancelFlag::default(),
            devtools_opened: AtomicBool::new(false),
        }
    }

    pub(crate) fn inject_params(&self, app_handle: &AppHandle) -> InjectParams {
        InjectParams::from_app(app_handle, self.config.development_server)
    }

    /// Returns `true` exactly once, for the first caller.
    pub(crate) fn claim_devtools_open(&self) -> bool {
        self.devtools_opened
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
