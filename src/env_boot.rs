use std::path::Path;

use tracing::debug;

/// Load `<project_dir>/.env` if it exists. Nothing outside the project
/// directory is consulted, and variables already in the process environment
/// are never overwritten.
pub fn ensure_dotenv(project_dir: &Path) -> bool {
    let candidate = project_dir.join(".env");
    if !candidate.is_file() {
        return false;
    }
    match dotenv::from_path(&candidate) {
        Ok(()) => {
            debug!(path = %candidate.display(), "loaded project .env");
            true
        }
        Err(e) => {
            debug!(path = %candidate.display(), error = %e, "could not read project .env");
            false
        }
    }
}
