use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing::Level;

/// Initialize the tracing subscriber writing to stderr. Safe to call
/// multiple times; subsequent calls are no-ops for the global subscriber.
pub fn init_default() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(false)
        .try_init();
}

/// Initialize the tracing subscriber appending to `path` instead of stderr,
/// keeping the alternate screen clean while the simulator runs.
pub fn init_file(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(false)
        .try_init();
    Ok(())
}
