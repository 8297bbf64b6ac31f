pub mod config;
pub mod logging;

pub mod downloader;
pub mod error;
pub mod fetch_head;
pub mod progress_store;
pub mod segmenter;
pub mod storage;
pub mod transport;
pub mod url_model;

pub use downloader::{DownloadEngine, DownloadReport, EngineOptions, TransferMode};
pub use error::DownloadError;
