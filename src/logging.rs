use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Arc;

use directories::ProjectDirs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn log_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "RustQuickLook", "RustQuickLook")
        .map(|dirs| dirs.data_local_dir().join("logs").join("rust-quick-look.log"))
}

fn open_log_file() -> Option<File> {
    let path = log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    File::create(path).ok()
}

// Installs the global subscriber. `RUST_LOG` wins over `default_filter`.
// With `to_stderr`, or when the log file cannot be created, output goes to
// stderr.
pub fn init(default_filter: &str, to_stderr: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file = if to_stderr { None } else { open_log_file() };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match file {
        Some(file) => registry
            .with(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
            .try_init(),
        None => registry.with(fmt::layer().with_writer(std::io::stderr)).try_init(),
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
