use crate::{logging, runtime_paths, DESKTOP_LOG_FILE, DESKTOP_LOG_MAX_BYTES};

fn append_channel_log(channel: &str, message: &str) {
    let log_path =
        logging::resolve_desktop_log_path(runtime_paths::default_root_dir(), DESKTOP_LOG_FILE);
    logging::append_log_line(&log_path, DESKTOP_LOG_MAX_BYTES, channel, message);
}

pub(crate) fn append_desktop_log(message: &str) {
    append_channel_log("desktop", message);
}

pub(crate) fn append_startup_log(message: &str) {
    append_channel_log("startup", message);
}

pub(crate) fn append_protocol_log(message: &str) {
    append_channel_log("protocol", message);
}

pub(crate) fn append_bridge_log(message: &str) {
    append_channel_log("bridge", message);
}
