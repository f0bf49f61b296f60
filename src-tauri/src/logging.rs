use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};

pub(crate) fn resolve_desktop_log_path(root_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    root_dir
        .map(|root| root.join("logs").join(file_name))
        .unwrap_or_else(|| std::env::temp_dir().join("appshell").join(file_name))
}

pub(crate) fn format_log_line(channel: &str, message: &str, now: DateTime<Local>) -> String {
    format!(
        "[{}] [{}] {}\n",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        channel,
        message.trim_end()
    )
}

fn rotate_if_oversized(log_path: &Path, max_bytes: u64) {
    let Ok(metadata) = fs::metadata(log_path) else {
        return;
    };
    if metadata.len() < max_bytes {
        return;
    }

    let mut rotated = log_path.as_os_str().to_owned();
    rotated.push(".1");
    let _ = fs::rename(log_path, PathBuf::from(rotated));
}

pub(crate) fn append_log_line(log_path: &Path, max_bytes: u64, channel: &str, message: &str) {
    if let Some(parent) = log_path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    rotate_if_oversized(log_path, max_bytes);

    let line = format_log_line(channel, message, Local::now());
    #[cfg(debug_assertions)]
    eprint!("{line}");

    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(log_path) {
        let _ = file.write_all(line.as_bytes());
    }
}
