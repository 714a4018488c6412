use std::sync::Once;
use std::{env, path::PathBuf};

use dirs::home_dir;

const DEFAULT_DIR_NAME: &str = ".bilancio_core";
const DATASET_DIR: &str = "datasets";
const BACKUP_DIR: &str = "backups";
const STATE_FILE: &str = "state.json";
const CONFIG_FILE: &str = "config.json";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("bilancio_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

/// Returns the application-specific data directory, defaulting to `~/.bilancio_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("BILANCIO_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Absolute path to the managed datasets directory under `base`.
pub fn datasets_dir_in(base: &std::path::Path) -> PathBuf {
    base.join(DATASET_DIR)
}

/// Base directory for backup snapshots under `base`.
pub fn backups_dir_in(base: &std::path::Path) -> PathBuf {
    base.join(BACKUP_DIR)
}

/// Path to the shared state file (tracking the last opened dataset).
pub fn state_file_in(base: &std::path::Path) -> PathBuf {
    base.join(STATE_FILE)
}

/// Path to the application configuration file.
pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Creates `dir` and any missing parents.
pub fn ensure_dir(dir: &std::path::Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

/// Rounds a currency amount to 2 decimal places.
///
/// Applied only at allocation boundaries (overspend splits, savings
/// amounts); intermediate sums stay unrounded.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round2;

    #[test]
    fn round2_truncates_to_cents() {
        assert_eq!(round2(33.3333), 33.33);
        assert_eq!(round2(99.999), 100.0);
        assert_eq!(round2(-41.666666), -41.67);
    }
}
