use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::downloader::{DEFAULT_CHUNK_SIZE, DEFAULT_THREAD_NUM};

/// Global configuration loaded from `~/.config/resdl/config.toml`.
/// Command-line flags override every value here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResdlConfig {
    /// Concurrent chunk workers per download.
    #[serde(default = "default_thread_num")]
    pub thread_num: usize,
    /// Chunk size in bytes for new downloads. Resumed downloads keep the size they started with.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,
    /// Send `Range: bytes=0-` with the HEAD probe.
    #[serde(default)]
    pub probe_range: bool,
    /// Directory for progress records (None = next to the output file).
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
    /// Connect timeout for every HTTP request, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_thread_num() -> usize {
    DEFAULT_THREAD_NUM
}

fn default_chunk_size() -> u32 {
    DEFAULT_CHUNK_SIZE
}

fn default_connect_timeout_secs() -> u64 {
    30
}

impl Default for ResdlConfig {
    fn default() -> Self {
        Self {
            thread_num: default_thread_num(),
            chunk_size: default_chunk_size(),
            probe_range: false,
            state_dir: None,
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("resdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ResdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ResdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ResdlConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ResdlConfig::default();
        assert_eq!(cfg.thread_num, 3);
        assert_eq!(cfg.chunk_size, 65536);
        assert!(!cfg.probe_range);
        assert!(cfg.state_dir.is_none());
        assert_eq!(cfg.connect_timeout_secs, 30);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = ResdlConfig {
            state_dir: Some(PathBuf::from("/var/tmp/resdl")),
            ..ResdlConfig::default()
        };
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ResdlConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.thread_num, cfg.thread_num);
        assert_eq!(parsed.chunk_size, cfg.chunk_size);
        assert_eq!(parsed.state_dir, cfg.state_dir);
    }

    #[test]
    fn config_toml_minimal() {
        let toml = r#"
            thread_num = 8
            chunk_size = 1048576
        "#;
        let cfg: ResdlConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.thread_num, 8);
        assert_eq!(cfg.chunk_size, 1_048_576);
        assert!(!cfg.probe_range);
        assert!(cfg.state_dir.is_none());
        assert_eq!(cfg.connect_timeout_secs, 30);
    }

    #[test]
    fn config_toml_all_fields() {
        let toml = r#"
            thread_num = 2
            chunk_size = 4096
            probe_range = true
            state_dir = "/tmp/records"
            connect_timeout_secs = 5
        "#;
        let cfg: ResdlConfig = toml::from_str(toml).unwrap();
        assert!(cfg.probe_range);
        assert_eq!(cfg.state_dir.as_deref(), Some(std::path::Path::new("/tmp/records")));
        assert_eq!(cfg.connect_timeout_secs, 5);
    }

    #[test]
    fn config_toml_partial_uses_defaults() {
        let toml = r#"
            probe_range = true
            state_dir = "/tmp/records"
        "#;
        let cfg: ResdlConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.thread_num, 3);
        assert_eq!(cfg.chunk_size, 65536);
        assert!(cfg.probe_range);
        assert_eq!(cfg.connect_timeout_secs, 30);
    }
}
