//! tracing setup. The CLI logs to a file under the XDG state dir and drops
//! to stderr when that file cannot be opened.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info,resdl=debug,resdl_core=debug";

const LOG_FILE_NAME: &str = "resdl.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `$XDG_STATE_HOME/resdl/resdl.log`, creating the directory.
pub fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("resdl")?;
    let state_home = dirs.get_state_home();
    fs::create_dir_all(&state_home)
        .with_context(|| format!("create log dir {}", state_home.display()))?;
    Ok(state_home.join(LOG_FILE_NAME))
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

fn install(writer: BoxMakeWriter) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install tracing subscriber: {}", e))
}

/// Appends structured logs to [`log_file_path`]. Returns the path on success;
/// on error nothing is installed and the caller may use [`init_logging_stderr`].
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = open_append(&path)?;
    install(BoxMakeWriter::new(Mutex::new(file)))?;
    tracing::info!("resdl logging initialized at {}", path.display());
    Ok(path)
}

/// Stderr-only logging. A subscriber that is already installed is left alone.
pub fn init_logging_stderr() {
    let _ = install(BoxMakeWriter::new(std::io::stderr));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_append_keeps_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        fs::write(&path, b"first\n").unwrap();
        {
            use std::io::Write;
            let mut f = open_append(&path).unwrap();
            f.write_all(b"second\n").unwrap();
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn open_append_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(LOG_FILE_NAME);
        let err = open_append(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("missing"));
    }
}
