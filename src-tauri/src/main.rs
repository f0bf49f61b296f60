#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_helpers;
mod app_runtime;
mod app_types;
mod asset_schemes;
mod desktop_bridge;
mod desktop_bridge_commands;
mod load_task;
mod logging;
mod main_window;
mod runtime_paths;

pub(crate) use app_constants::*;
pub(crate) use app_helpers::{
    append_bridge_log, append_desktop_log, append_protocol_log, append_startup_log,
};
pub(crate) use app_types::{InjectParams, ShellState, WindowStateSnapshot};

fn main() {
    app_runtime::run();
}
