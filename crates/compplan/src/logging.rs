use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Maximum log file size before rotation (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Size to keep after rotation (1 MB of most recent logs)
const KEEP_SIZE: u64 = 1024 * 1024;

/// Rotate log file if it exceeds the maximum size.
/// Keeps only the most recent KEEP_SIZE bytes.
fn rotate_log_if_needed(log_path: &Path) -> std::io::Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let metadata = fs::metadata(log_path)?;
    if metadata.len() <= MAX_LOG_SIZE {
        return Ok(());
    }

    let mut file = File::open(log_path)?;
    let start_pos = metadata.len().saturating_sub(KEEP_SIZE);
    file.seek(SeekFrom::Start(start_pos))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    drop(file);

    // Skip to the first newline to avoid partial lines
    let skip = buffer
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);

    let mut file = File::create(log_path)?;
    file.write_all(b"--- Log rotated (older entries removed) ---\n")?;
    file.write_all(&buffer[skip..])?;

    Ok(())
}

/// Default filter used when `RUST_LOG` is not set
pub fn default_filter(level: &str) -> String {
    format!("compplan={level},compplan_core=warn")
}

/// Initialize logging to stderr and, optionally, to a log file.
///
/// The log level can be controlled via the `level` parameter or the
/// `RUST_LOG` environment variable. File output is appended to `log_file`
/// through a background writer; the returned guard flushes it on drop, so
/// the caller must keep it alive until exit.
pub fn init_logging(
    level: &str,
    log_file: Option<&Path>,
) -> color_eyre::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let (file_layer, guard) = match log_file {
        Some(log_path) => {
            if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            if let Err(e) = rotate_log_if_needed(log_path) {
                eprintln!("Warning: Failed to rotate log file: {e}");
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();

    match log_file {
        Some(path) => tracing::info!("Compplan logging initialized (log_path={})", path.display()),
        None => tracing::debug!("Compplan logging initialized"),
    }
    Ok(guard)
}
