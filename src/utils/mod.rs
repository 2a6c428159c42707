use dirs::home_dir;
use std::sync::Once;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".onboard_core";
const DRAFT_DIR: &str = "drafts";
const BLOB_DIR: &str = "blobs";
const STATE_FILE: &str = "state.json";
const CONFIG_FILE: &str = "config.json";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("onboard_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

/// Returns the application-specific data directory, defaulting to `~/.onboard_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("ONBOARD_CORE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Absolute path to the managed drafts directory.
pub fn drafts_dir_in(base: &std::path::Path) -> PathBuf {
    base.join(DRAFT_DIR)
}

/// Directory holding content-addressed attachment blobs.
pub fn blobs_dir_in(base: &std::path::Path) -> PathBuf {
    base.join(BLOB_DIR)
}

/// Path to the shared state file (tracking resume cursors per flow).
pub fn state_file_in(base: &std::path::Path) -> PathBuf {
    base.join(STATE_FILE)
}

/// Path to the active configuration file.
pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Creates the directory (and parents) when missing.
pub fn ensure_dir(path: &std::path::Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
