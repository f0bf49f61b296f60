use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use url::Url;

use crate::{
    BLANK_PAGE_URL, MAIN_WINDOW_HEIGHT, MAIN_WINDOW_LABEL, MAIN_WINDOW_TITLE, MAIN_WINDOW_WIDTH,
};

/// Creates the main window on a blank page; the initial-load task navigates it afterwards.
pub(crate) fn create_main_window(
    app_handle: &AppHandle,
    bridge_script: &str,
    hardware_acceleration: bool,
) -> Result<WebviewWindow, String> {
    if let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) {
        return Ok(window);
    }

    let blank = Url::parse(BLANK_PAGE_URL)
        .map_err(|error| format!("Invalid blank page url {BLANK_PAGE_URL}: {error}"))?;
    let builder =
        WebviewWindowBuilder::new(app_handle, MAIN_WINDOW_LABEL, WebviewUrl::External(blank))
            .title(MAIN_WINDOW_TITLE)
            .inner_size(MAIN_WINDOW_WIDTH, MAIN_WINDOW_HEIGHT)
            .fullscreen(false)
            .initialization_script(bridge_script);

    #[cfg(target_os = "windows")]
    let builder = if hardware_acceleration {
        builder
    } else {
        builder.additional_browser_args(crate::WINDOWS_DISABLE_GPU_ARGS)
    };
    #[cfg(not(target_os = "windows"))]
    let _ = hardware_acceleration;

    builder
        .build()
        .map_err(|error| format!("Failed to create main window: {error}"))
}

pub(crate) fn focus_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("focus_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.unminimize() {
        log(&format!("failed to unminimize main window: {error}"));
    }
    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
}

pub(crate) fn open_devtools<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("open_devtools skipped: main window not found");
        return;
    };

    #[cfg(debug_assertions)]
    {
        window.open_devtools();
        log("devtools opened for main window");
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = window;
        log("devtools are unavailable in release builds");
    }
}
