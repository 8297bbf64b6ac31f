//! CLI for the resdl resumable downloader.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use resdl_core::config::{self, ResdlConfig};
use resdl_core::transport::{CurlOptions, CurlTransport};
use resdl_core::{DownloadEngine, EngineOptions};

/// Download one URL, in parallel chunks when the server allows it.
/// Re-running the same command after an interruption resumes the transfer.
#[derive(Debug, Parser)]
#[command(name = "resdl")]
#[command(about = "resdl: resumable segmented HTTP downloader", long_about = None)]
pub struct Cli {
    /// HTTP/HTTPS URL to download.
    #[arg(short = 'u', long)]
    pub url: String,

    /// Number of concurrent chunk workers.
    #[arg(short = 't', long, value_name = "N")]
    pub thread_num: Option<usize>,

    /// Chunk size in bytes for a new download.
    #[arg(short = 'c', long, value_name = "BYTES")]
    pub chunk_size: Option<u32>,

    /// Output directory (default: current directory).
    #[arg(short = 'd', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Send `Range: bytes=0-` with the HEAD probe.
    #[arg(long)]
    pub probe_range: bool,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        cli.run(&cfg).await
    }

    /// Flags win over config values; config wins over built-in defaults.
    pub fn engine_options(&self, cfg: &ResdlConfig) -> Result<EngineOptions> {
        let output_dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("resolve current directory")?,
        };
        Ok(EngineOptions {
            thread_num: self.thread_num.unwrap_or(cfg.thread_num),
            chunk_size: self.chunk_size.unwrap_or(cfg.chunk_size),
            state_dir: cfg.state_dir.clone(),
            probe_range: self.probe_range || cfg.probe_range,
            ..EngineOptions::new(self.url.clone(), output_dir)
        })
    }

    async fn run(&self, cfg: &ResdlConfig) -> Result<()> {
        let options = self.engine_options(cfg)?;
        let transport = CurlTransport::new(CurlOptions {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
        });
        let engine = DownloadEngine::new(transport, options);
        let report = tokio::task::spawn_blocking(move || engine.run())
            .await
            .context("download task panicked")??;

        if report.resumed {
            eprintln!("resumed {}", report.output_path.display());
        }
        println!("download spent {:.3} seconds", report.elapsed.as_secs_f64());
        Ok(())
    }
}
