//! Minimal HTTP image store: upload, list, download staging, and delete
//! over a fixed local directory tree.

use std::path::PathBuf;
use std::sync::Arc;

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;

pub use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Directory holding uploaded images
    pub upload_dir: PathBuf,
    /// Directory receiving staged download copies
    pub download_dir: PathBuf,
    /// Configuration
    pub config: Arc<Config>,
}
