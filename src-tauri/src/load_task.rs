use std::{
    net::{TcpStream, ToSocketAddrs},
    time::Duration,
};

use shell_host::{spawn_load_retry, LoadRetryController, Navigator, ThreadSleeper};
use tauri::{AppHandle, Manager, WebviewWindow};
use url::Url;

use crate::{ShellState, DEV_SERVER_PROBE_TIMEOUT_MS, MAIN_WINDOW_LABEL};

pub(crate) fn is_reachable(url: &Url, timeout: Duration) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let port = url.port_or_known_default().unwrap_or(80);
    let timeout = timeout.max(Duration::from_millis(50));

    let Ok(addrs) = (host, port).to_socket_addrs() else {
        return false;
    };
    addrs
        .into_iter()
        .any(|address| TcpStream::connect_timeout(&address, timeout).is_ok())
}

struct WindowNavigator {
    window: WebviewWindow,
    probe_reachability: bool,
}

impl Navigator for WindowNavigator {
    fn navigate(&self, url: &str) -> Result<(), String> {
        let parsed = Url::parse(url).map_err(|error| format!("invalid url {url}: {error}"))?;

        // The webview reports no error for an unreachable dev server, so check first.
        if self.probe_reachability
            && matches!(parsed.scheme(), "http" | "https")
            && !is_reachable(&parsed, Duration::from_millis(DEV_SERVER_PROBE_TIMEOUT_MS))
        {
            return Err(format!(
                "{} is not accepting connections",
                parsed.origin().ascii_serialization()
            ));
        }

        self.window
            .navigate(parsed)
            .map_err(|error| format!("navigation failed: {error}"))
    }
}

/// Points the main window at the configured entry url on a background retry chain.
pub(crate) fn spawn_initial_load<F>(app_handle: &AppHandle, log: F) -> Result<(), String>
where
    F: Fn(&str) + Send + 'static,
{
    let state = app_handle.state::<ShellState>();
    let window = app_handle
        .get_webview_window(MAIN_WINDOW_LABEL)
        .ok_or_else(|| "Main window is unavailable for the initial load.".to_string())?;

    let navigator = WindowNavigator {
        window,
        probe_reachability: state.config.development_server,
    };
    let controller = LoadRetryController::new(navigator, ThreadSleeper, state.config.retry)
        .with_cancel_flag(state.load_cancel.clone());
    let url = state.config.entry_url();
    log(&format!("loading {url}"));

    spawn_load_retry(controller, url, log)
        .map(|_| ())
        .map_err(|error| format!("Failed to spawn initial load task: {error}"))
}
