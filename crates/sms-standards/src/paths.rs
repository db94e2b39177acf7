//! Standards directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the standards directory.
pub const STANDARDS_ENV_VAR: &str = "SMS_STANDARDS_DIR";

/// File name of the form definitions inside the standards directory.
pub const FORMS_FILE: &str = "forms.toml";

/// Get the standards root directory.
///
/// Resolution order:
/// 1. `SMS_STANDARDS_DIR` environment variable
/// 2. `standards/` directory relative to workspace root
pub fn standards_root() -> PathBuf {
    if let Ok(root) = std::env::var(STANDARDS_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}

/// Path of the default form definitions file.
pub fn forms_path() -> PathBuf {
    standards_root().join(FORMS_FILE)
}
