//! Settings consumed by the checker, resolved from the project `.env`, the
//! process environment and CLI overrides (highest priority last).

use std::path::{Path, PathBuf};

use crate::util::env as env_util;

pub const TIGER_KEY: &str = "NOMINATIM_USE_US_TIGER_DATA";

#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub database_dsn: Option<String>,
    pub use_us_tiger_data: bool,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub project_dir: PathBuf,
    pub database_dsn: String,
    pub use_us_tiger_data: bool,
}

impl Settings {
    /// Build from whatever is already in the process environment; the project
    /// `.env` is expected to have been applied via `env_boot::ensure_dotenv`.
    pub fn resolve(project_dir: &Path, overrides: SettingsOverrides) -> Self {
        let database_dsn = overrides
            .database_dsn
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(env_util::db_dsn);
        let use_us_tiger_data = overrides.use_us_tiger_data || env_util::env_flag(TIGER_KEY, false);
        Self {
            project_dir: project_dir.to_path_buf(),
            database_dsn,
            use_us_tiger_data,
        }
    }
}
