//! Where duoview keeps its files on disk
//!
//! Everything sits in one per-user directory: `config.yaml` at the top and
//! the rolling log files in `logs/`.

use std::{env, fs, path::PathBuf};

const APP_DIR: &str = "duoview";
const CONFIG_FILE: &str = "config.yaml";
const LOGS_SUBDIR: &str = "logs";

/// Prefix shared by every log file; the appender adds a `.YYYY-MM-DD` suffix
pub const LOG_FILE_NAME: &str = "duoview.log";

/// Per-user duoview directory.
///
/// `%APPDATA%\duoview` on Windows. Elsewhere `$XDG_CONFIG_HOME/duoview`,
/// falling back to `~/.config/duoview` (also on macOS, not
/// `~/Library/Application Support`).
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let base = env::var_os("APPDATA").map(PathBuf::from);

    #[cfg(not(target_os = "windows"))]
    let base = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

    base.map(|base| base.join(APP_DIR))
}

pub fn config_file() -> Option<PathBuf> {
    Some(config_dir()?.join(CONFIG_FILE))
}

pub fn logs_dir() -> Option<PathBuf> {
    Some(config_dir()?.join(LOGS_SUBDIR))
}

/// Create the logs directory (and its parents) if needed
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or("no home or config directory to log into")?;
    fs::create_dir_all(&logs)
        .map_err(|e| format!("cannot create {}: {}", logs.display(), e))?;
    Ok(logs)
}
