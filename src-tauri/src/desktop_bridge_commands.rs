use serde_json::Value;
use tauri::{AppHandle, Manager};

use crate::{append_bridge_log, ShellState};

/// Single IPC entry point behind `window.api.*`. A failing capability rejects the caller's
/// promise with the capability's own message.
#[tauri::command]
pub(crate) async fn desktop_bridge_invoke(
    app_handle: AppHandle,
    name: String,
    payload: Option<Value>,
) -> Result<Value, String> {
    let state = app_handle.state::<ShellState>();
    let context = state.inject_params(&app_handle);

    state
        .bridge
        .invoke(&name, payload.unwrap_or(Value::Null), &context)
        .map_err(|error| {
            append_bridge_log(&format!("capability {name} failed: {error}"));
            error.to_string()
        })
}
