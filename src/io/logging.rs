use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::io::todo_io::sibling_path;

const DEFAULT_FILTER: &str = "todohd=info";

/// `todohd.json` → `todohd.json.20240131.log`
pub fn log_path(data_path: &Path, today: NaiveDate) -> PathBuf {
    sibling_path(data_path, &today.format("%Y%m%d").to_string(), "log")
}

/// Install the file logger when `enabled` or `RUST_LOG` is set. Returns
/// the log file path when logging is on.
pub fn init(data_path: &Path, enabled: bool) -> io::Result<Option<PathBuf>> {
    if !enabled && std::env::var_os("RUST_LOG").is_none() {
        return Ok(None);
    }

    let path = log_path(data_path, chrono::Local::now().date_naive());
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_target(false)
        .with_ansi(false)
        .with_filter(filter);

    // A second init (tests, reload) keeps the first subscriber
    let _ = tracing_subscriber::registry().with(file_layer).try_init();
    Ok(Some(path))
}
