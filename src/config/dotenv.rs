use crate::utils::error::{MarketError, Result};
use std::path::Path;

/// Loads one dotenv file into the process environment. Variables that are
/// already set win.
///
/// A missing file is `Ok(false)`. A file that exists but cannot be read or
/// parsed is an error.
pub fn load_env_file(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(MarketError::EnvFileError {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
    }
}
